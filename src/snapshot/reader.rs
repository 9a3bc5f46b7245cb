//! Snapshot reader

use std::fs;
use std::io;
use std::path::Path;

use crate::storage::{MemorySubstrate, StorageSubstrate};

use super::errors::{SnapshotError, SnapshotResult};
use super::record::SnapshotRecord;
use super::SNAPSHOT_MAGIC;

/// Loads a snapshot file back into a substrate.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Read and verify the snapshot at `path`.
    ///
    /// Every record's checksum is verified before anything is applied;
    /// a damaged file yields an error, never a partial substrate.
    pub fn read(path: &Path) -> SnapshotResult<MemorySubstrate> {
        let data = fs::read(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SnapshotError::not_found(format!("no snapshot at {}", path.display()))
            } else {
                SnapshotError::io_error(format!("failed to read {}", path.display()), e)
            }
        })?;

        if data.len() < SNAPSHOT_MAGIC.len() || &data[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
            return Err(SnapshotError::corruption("bad or missing snapshot magic"));
        }

        let mut substrate = MemorySubstrate::new();
        let mut offset = SNAPSHOT_MAGIC.len();
        while offset < data.len() {
            let (record, consumed) = SnapshotRecord::deserialize(&data[offset..])
                .map_err(|e| SnapshotError::corruption_at_offset(offset, e.message()))?;
            substrate.put(record.key, record.value);
            offset += consumed;
        }

        Ok(substrate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{StorageKey, SubPointer};
    use crate::snapshot::SnapshotWriter;
    use tempfile::TempDir;

    fn populated_snapshot(path: &Path) {
        let mut substrate = MemorySubstrate::new();
        for n in 0..5u64 {
            substrate.put(
                StorageKey::derive(2, SubPointer::from_scalar(n)),
                vec![n as u8; 40],
            );
        }
        SnapshotWriter::write(path, &substrate).unwrap();
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = SnapshotReader::read(&temp_dir.path().join("absent.snap")).unwrap_err();
        assert_eq!(err.code().code(), "VIGIL_SNAPSHOT_NOT_FOUND");
    }

    #[test]
    fn test_bad_magic_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.snap");
        fs::write(&path, b"NOTASNAP").unwrap();
        let err = SnapshotReader::read(&path).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_flipped_byte_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.snap");
        populated_snapshot(&path);

        let mut bytes = fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xff;
        fs::write(&path, &bytes).unwrap();

        let err = SnapshotReader::read(&path).unwrap_err();
        assert_eq!(err.code().code(), "VIGIL_SNAPSHOT_CORRUPTION");
    }

    #[test]
    fn test_trailing_garbage_fails_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.snap");
        populated_snapshot(&path);

        let mut bytes = fs::read(&path).unwrap();
        bytes.extend_from_slice(&[0x00, 0x01, 0x02]);
        fs::write(&path, &bytes).unwrap();

        assert!(SnapshotReader::read(&path).is_err());
    }

    #[test]
    fn test_empty_snapshot_loads_empty_substrate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.snap");
        SnapshotWriter::write(&path, &MemorySubstrate::new()).unwrap();
        let substrate = SnapshotReader::read(&path).unwrap();
        assert!(substrate.is_empty());
    }
}
