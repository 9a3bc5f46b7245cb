//! Storage key composition
//!
//! Per STORAGE.md §2, the substrate key format is bit-exact:
//!
//! ```text
//! +---------------------+------------------------+
//! | Namespace (u16 BE)  | Sub-pointer (30 bytes) |
//! +---------------------+------------------------+
//! ```
//!
//! Multi-slot payloads address slot N as `base key + N` under big-endian
//! addition over the full 32-byte key, so sequential slot keys never
//! collide within a record's declared slot budget.

use super::subpointer::SubPointer;
use super::word;

/// Width of a substrate key in bytes.
pub const KEY_LEN: usize = 32;

/// An opaque 32-byte substrate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageKey([u8; KEY_LEN]);

impl StorageKey {
    /// Compose a key from a namespace discriminant and a sub-pointer.
    pub fn derive(namespace: u16, sub: SubPointer) -> Self {
        let mut out = [0u8; KEY_LEN];
        out[..2].copy_from_slice(&namespace.to_be_bytes());
        out[2..].copy_from_slice(sub.as_bytes());
        Self(out)
    }

    /// Rehydrate a key from its raw bytes, as read back from a snapshot.
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// The key of slot `n` relative to this base key.
    ///
    /// `None` when the addition carries out of the key width; callers turn
    /// that into an arithmetic abort.
    pub fn offset(&self, n: u32) -> Option<StorageKey> {
        word::checked_add(&self.0, u64::from(n)).map(StorageKey)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}
