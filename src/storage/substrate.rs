//! Durable key-value substrate
//!
//! The ledger never touches disk or chain state directly; it reads and
//! writes cells through this trait. The host decides where the cells live.

use std::collections::BTreeMap;

use crate::codec::StorageKey;

/// The durable key-value store the ledger executes against.
///
/// Writes are unconditional overwrites. A key that was never written reads
/// back as `None`; the ledger's maps decode that as the zero value.
pub trait StorageSubstrate {
    /// Read the value stored under `key`.
    fn get(&self, key: &StorageKey) -> Option<Vec<u8>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: StorageKey, value: Vec<u8>);

    /// All entries in ascending key order. Used by snapshot persistence.
    fn entries(&self) -> Vec<(StorageKey, Vec<u8>)>;
}

/// Deterministic in-memory substrate.
///
/// Backed by a `BTreeMap` so iteration order is a pure function of
/// contents, which keeps snapshots byte-identical across runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySubstrate {
    cells: BTreeMap<StorageKey, Vec<u8>>,
}

impl MemorySubstrate {
    /// Create an empty substrate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell has ever been written.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl StorageSubstrate for MemorySubstrate {
    fn get(&self, key: &StorageKey) -> Option<Vec<u8>> {
        self.cells.get(key).cloned()
    }

    fn put(&mut self, key: StorageKey, value: Vec<u8>) {
        self.cells.insert(key, value);
    }

    fn entries(&self) -> Vec<(StorageKey, Vec<u8>)> {
        self.cells
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SubPointer;

    fn key(n: u64) -> StorageKey {
        StorageKey::derive(0, SubPointer::from_scalar(n))
    }

    #[test]
    fn test_unwritten_key_reads_none() {
        let store = MemorySubstrate::new();
        assert_eq!(store.get(&key(1)), None);
    }

    #[test]
    fn test_put_overwrites() {
        let mut store = MemorySubstrate::new();
        store.put(key(1), vec![1]);
        store.put(key(1), vec![2, 3]);
        assert_eq!(store.get(&key(1)), Some(vec![2, 3]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_entries_ascend_by_key() {
        let mut store = MemorySubstrate::new();
        store.put(key(9), vec![9]);
        store.put(key(1), vec![1]);
        store.put(key(4), vec![4]);
        let entries = store.entries();
        let keys: Vec<_> = entries.iter().map(|(k, _)| *k).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
