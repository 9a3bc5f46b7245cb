//! Snapshot record codec
//!
//! Per STORAGE.md §4, one substrate entry serializes as:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes this field and the checksum)
//! +------------------+
//! | Key Length       | (u32 LE, always 32)
//! +------------------+
//! | Key              |
//! +------------------+
//! | Value Length     | (u32 LE)
//! +------------------+
//! | Value            |
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over all preceding bytes)
//! +------------------+
//! ```

use crate::codec::{StorageKey, KEY_LEN};

use super::checksum::compute_checksum;
use super::errors::{SnapshotError, SnapshotResult};

/// One persisted substrate entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub key: StorageKey,
    pub value: Vec<u8>,
}

/// Smallest possible record: empty value.
const MIN_RECORD_LEN: usize = 4 + 4 + KEY_LEN + 4 + 4;

impl SnapshotRecord {
    /// Pair up a substrate entry.
    pub fn new(key: StorageKey, value: Vec<u8>) -> Self {
        Self { key, value }
    }

    /// Serialize the record, checksum included.
    pub fn serialize(&self) -> Vec<u8> {
        let record_len = (MIN_RECORD_LEN + self.value.len()) as u32;

        let mut out = Vec::with_capacity(record_len as usize);
        out.extend_from_slice(&record_len.to_le_bytes());
        out.extend_from_slice(&(KEY_LEN as u32).to_le_bytes());
        out.extend_from_slice(self.key.as_bytes());
        out.extend_from_slice(&(self.value.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.value);

        let checksum = compute_checksum(&out);
        out.extend_from_slice(&checksum.to_le_bytes());
        out
    }

    /// Deserialize one record from the front of `data`, verifying its
    /// checksum. Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> SnapshotResult<(Self, usize)> {
        if data.len() < MIN_RECORD_LEN {
            return Err(SnapshotError::corruption("record truncated before length"));
        }

        let record_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if record_len < MIN_RECORD_LEN {
            return Err(SnapshotError::corruption(format!(
                "declared record length {} below minimum {}",
                record_len, MIN_RECORD_LEN
            )));
        }
        if data.len() < record_len {
            return Err(SnapshotError::corruption(format!(
                "record truncated: {} bytes declared, {} available",
                record_len,
                data.len()
            )));
        }

        let checksum_offset = record_len - 4;
        let stored = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed = compute_checksum(&data[..checksum_offset]);
        if computed != stored {
            return Err(SnapshotError::corruption(format!(
                "checksum mismatch: computed {:08x}, stored {:08x}",
                computed, stored
            )));
        }

        let key_len = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
        if key_len != KEY_LEN {
            return Err(SnapshotError::corruption(format!(
                "key length {} is not the fixed key width {}",
                key_len, KEY_LEN
            )));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&data[8..8 + KEY_LEN]);

        let value_offset = 8 + KEY_LEN;
        let value_len = u32::from_le_bytes([
            data[value_offset],
            data[value_offset + 1],
            data[value_offset + 2],
            data[value_offset + 3],
        ]) as usize;
        if value_offset + 4 + value_len != checksum_offset {
            return Err(SnapshotError::corruption(
                "value length disagrees with record length",
            ));
        }
        let value = data[value_offset + 4..value_offset + 4 + value_len].to_vec();

        Ok((
            Self {
                key: StorageKey::from_bytes(key),
                value,
            },
            record_len,
        ))
    }
}
