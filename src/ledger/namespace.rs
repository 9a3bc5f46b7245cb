//! Storage namespace enumeration
//!
//! Every logical map owns one namespace; the discriminant becomes the
//! 2-byte prefix of every key in that map (STORAGE.md §2). Assignments are
//! fixed by declaration order at compile time, so a rebuild always lays
//! state out identically. Appending a namespace is allowed; reordering or
//! removing one is a layout-breaking change.

use crate::codec::{StorageKey, SubPointer};

/// The logical storage maps of the ledger, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Namespace {
    /// Global switch counter, a single cell
    NextSwitchId = 0,
    /// Switch owner account
    Owner = 1,
    /// Switch beneficiary account
    Beneficiary = 2,
    /// Heartbeat interval in blocks
    Interval = 3,
    /// Post-trigger cancellation window in blocks
    GracePeriod = 4,
    /// Block of the most recent checkin
    LastCheckin = 5,
    /// Lifecycle status
    Status = 6,
    /// Block of the most recent trigger
    TriggerBlock = 7,
    /// Number of contiguous data chunks
    ChunkCount = 8,
    /// Encrypted key payload (multi-slot)
    EncryptedKey = 9,
    /// Data chunk payloads (multi-slot, compound sub-pointer)
    DataChunk = 10,
    /// Per-owner switch count
    OwnerCount = 11,
    /// Per-owner switch list entries (compound sub-pointer)
    OwnerIndex = 12,
}

impl Namespace {
    /// All namespaces in declaration order.
    pub const ALL: [Namespace; 13] = [
        Namespace::NextSwitchId,
        Namespace::Owner,
        Namespace::Beneficiary,
        Namespace::Interval,
        Namespace::GracePeriod,
        Namespace::LastCheckin,
        Namespace::Status,
        Namespace::TriggerBlock,
        Namespace::ChunkCount,
        Namespace::EncryptedKey,
        Namespace::DataChunk,
        Namespace::OwnerCount,
        Namespace::OwnerIndex,
    ];

    /// The substrate key for `sub` inside this namespace.
    pub fn key(self, sub: SubPointer) -> StorageKey {
        StorageKey::derive(self as u16, sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminants_are_contiguous_in_declaration_order() {
        for (expected, ns) in Namespace::ALL.iter().enumerate() {
            assert_eq!(*ns as u16, expected as u16);
        }
        assert_eq!(Namespace::ALL.len(), 13);
    }

    #[test]
    fn test_namespaces_never_share_keys() {
        let sub = SubPointer::from_scalar(1);
        let mut keys = std::collections::BTreeSet::new();
        for ns in Namespace::ALL {
            assert!(keys.insert(ns.key(sub)));
        }
    }
}
