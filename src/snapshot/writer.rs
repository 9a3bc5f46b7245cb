//! Snapshot writer

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::StorageSubstrate;

use super::errors::{SnapshotError, SnapshotResult};
use super::record::SnapshotRecord;
use super::SNAPSHOT_MAGIC;

/// Writes the whole substrate to a snapshot file.
pub struct SnapshotWriter;

impl SnapshotWriter {
    /// Persist `substrate` to `path`, replacing any previous snapshot.
    ///
    /// The bytes land in a sibling temp file first and are renamed into
    /// place, so a crash mid-write leaves the previous snapshot intact.
    /// Returns the number of records written.
    pub fn write(path: &Path, substrate: &dyn StorageSubstrate) -> SnapshotResult<usize> {
        let entries = substrate.entries();

        let mut buf = Vec::new();
        buf.extend_from_slice(SNAPSHOT_MAGIC);
        for (key, value) in &entries {
            buf.extend_from_slice(&SnapshotRecord::new(*key, value.clone()).serialize());
        }

        let tmp_path = tmp_sibling(path);
        fs::write(&tmp_path, &buf).map_err(|e| {
            SnapshotError::io_error(format!("failed to write {}", tmp_path.display()), e)
        })?;
        fs::rename(&tmp_path, path).map_err(|e| {
            SnapshotError::io_error(
                format!("failed to move snapshot into place at {}", path.display()),
                e,
            )
        })?;

        Ok(entries.len())
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{StorageKey, SubPointer};
    use crate::snapshot::SnapshotReader;
    use crate::storage::MemorySubstrate;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_preserves_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.snap");

        let mut substrate = MemorySubstrate::new();
        substrate.put(StorageKey::derive(0, SubPointer::ZERO), vec![1]);
        substrate.put(StorageKey::derive(3, SubPointer::from_scalar(9)), vec![2, 3]);

        let written = SnapshotWriter::write(&path, &substrate).unwrap();
        assert_eq!(written, 2);

        let restored = SnapshotReader::read(&path).unwrap();
        assert_eq!(restored.entries(), substrate.entries());
    }

    #[test]
    fn test_write_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.snap");
        let b = temp_dir.path().join("b.snap");

        let mut substrate = MemorySubstrate::new();
        for n in 0..20u64 {
            substrate.put(StorageKey::derive(1, SubPointer::from_scalar(n)), vec![n as u8]);
        }
        SnapshotWriter::write(&a, &substrate).unwrap();
        SnapshotWriter::write(&b, &substrate).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.snap");
        SnapshotWriter::write(&path, &MemorySubstrate::new()).unwrap();
        assert!(path.exists());
        assert!(!tmp_sibling(&path).exists());
    }
}
