//! Typed scalar storage maps
//!
//! One map per scalar field, each in its own namespace. Values are stored
//! in canonical 32-byte form. Reads of an unset cell decode as the type's
//! zero value, which is indistinguishable from an explicitly stored zero;
//! record existence is therefore always established through the counter,
//! never by probing a field.

use crate::codec::{word, AccountId, SubPointer, ACCOUNT_LEN};
use crate::storage::StorageSubstrate;

use super::errors::{LedgerError, LedgerResult};
use super::namespace::Namespace;

/// A u64-valued map keyed by sub-pointer.
pub(crate) struct U64Map {
    ns: Namespace,
}

impl U64Map {
    pub(crate) const fn new(ns: Namespace) -> Self {
        Self { ns }
    }

    pub(crate) fn get(
        &self,
        substrate: &dyn StorageSubstrate,
        sub: SubPointer,
    ) -> LedgerResult<u64> {
        match substrate.get(&self.ns.key(sub)) {
            None => Ok(0),
            Some(raw) => {
                let bytes: [u8; word::WORD_LEN] = raw.as_slice().try_into().map_err(|_| {
                    LedgerError::StorageCorruption(format!(
                        "scalar cell holds {} bytes, {} expected",
                        raw.len(),
                        word::WORD_LEN
                    ))
                })?;
                word::decode_u64(&bytes).ok_or_else(|| {
                    LedgerError::StorageCorruption(
                        "scalar cell exceeds the host integer range".to_string(),
                    )
                })
            }
        }
    }

    pub(crate) fn put(&self, substrate: &mut dyn StorageSubstrate, sub: SubPointer, value: u64) {
        substrate.put(self.ns.key(sub), word::encode_u64(value).to_vec());
    }
}

/// An account-valued map keyed by sub-pointer.
pub(crate) struct AccountMap {
    ns: Namespace,
}

impl AccountMap {
    pub(crate) const fn new(ns: Namespace) -> Self {
        Self { ns }
    }

    pub(crate) fn get(
        &self,
        substrate: &dyn StorageSubstrate,
        sub: SubPointer,
    ) -> LedgerResult<AccountId> {
        match substrate.get(&self.ns.key(sub)) {
            None => Ok(AccountId::ZERO),
            Some(raw) => {
                let bytes: [u8; ACCOUNT_LEN] = raw.as_slice().try_into().map_err(|_| {
                    LedgerError::StorageCorruption(format!(
                        "account cell holds {} bytes, {} expected",
                        raw.len(),
                        ACCOUNT_LEN
                    ))
                })?;
                Ok(AccountId::new(bytes))
            }
        }
    }

    pub(crate) fn put(
        &self,
        substrate: &mut dyn StorageSubstrate,
        sub: SubPointer,
        value: &AccountId,
    ) {
        substrate.put(self.ns.key(sub), value.as_bytes().to_vec());
    }
}

/// Sub-pointer of the single counter cell.
pub(crate) const COUNTER_SUB: SubPointer = SubPointer::ZERO;

pub(crate) const NEXT_SWITCH_ID: U64Map = U64Map::new(Namespace::NextSwitchId);
pub(crate) const OWNER: AccountMap = AccountMap::new(Namespace::Owner);
pub(crate) const BENEFICIARY: AccountMap = AccountMap::new(Namespace::Beneficiary);
pub(crate) const INTERVAL: U64Map = U64Map::new(Namespace::Interval);
pub(crate) const GRACE_PERIOD: U64Map = U64Map::new(Namespace::GracePeriod);
pub(crate) const LAST_CHECKIN: U64Map = U64Map::new(Namespace::LastCheckin);
pub(crate) const STATUS: U64Map = U64Map::new(Namespace::Status);
pub(crate) const TRIGGER_BLOCK: U64Map = U64Map::new(Namespace::TriggerBlock);
pub(crate) const CHUNK_COUNT: U64Map = U64Map::new(Namespace::ChunkCount);
pub(crate) const OWNER_COUNT: U64Map = U64Map::new(Namespace::OwnerCount);
pub(crate) const OWNER_INDEX: U64Map = U64Map::new(Namespace::OwnerIndex);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySubstrate;

    #[test]
    fn test_unset_scalar_reads_zero() {
        let substrate = MemorySubstrate::new();
        let sub = SubPointer::from_scalar(1);
        assert_eq!(INTERVAL.get(&substrate, sub).unwrap(), 0);
        assert_eq!(OWNER.get(&substrate, sub).unwrap(), AccountId::ZERO);
    }

    #[test]
    fn test_scalar_roundtrip() {
        let mut substrate = MemorySubstrate::new();
        let sub = SubPointer::from_scalar(5);
        INTERVAL.put(&mut substrate, sub, 144);
        assert_eq!(INTERVAL.get(&substrate, sub).unwrap(), 144);
    }

    #[test]
    fn test_account_roundtrip() {
        let mut substrate = MemorySubstrate::new();
        let sub = SubPointer::from_scalar(5);
        let account = AccountId::from_name("alice");
        OWNER.put(&mut substrate, sub, &account);
        assert_eq!(OWNER.get(&substrate, sub).unwrap(), account);
    }

    #[test]
    fn test_fields_do_not_collide_across_namespaces() {
        let mut substrate = MemorySubstrate::new();
        let sub = SubPointer::from_scalar(9);
        INTERVAL.put(&mut substrate, sub, 10);
        GRACE_PERIOD.put(&mut substrate, sub, 20);
        assert_eq!(INTERVAL.get(&substrate, sub).unwrap(), 10);
        assert_eq!(GRACE_PERIOD.get(&substrate, sub).unwrap(), 20);
    }

    #[test]
    fn test_short_cell_is_corruption() {
        let mut substrate = MemorySubstrate::new();
        let sub = SubPointer::from_scalar(2);
        substrate.put(Namespace::Interval.key(sub), vec![1, 2, 3]);
        let err = INTERVAL.get(&substrate, sub).unwrap_err();
        assert!(matches!(err, LedgerError::StorageCorruption(_)));
    }
}
