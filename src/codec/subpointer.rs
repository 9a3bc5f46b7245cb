//! Sub-pointer derivation
//!
//! Per STORAGE.md §2, a sub-pointer is the 30-byte sub-key that addresses
//! one record's cell inside a storage namespace. Scalars and accounts map
//! to sub-pointers by truncation to their low-order 30 bytes; compound
//! addresses (switch + chunk index, owner + list index) are formed by
//! byte-wise XOR of two derived sub-pointers.
//!
//! Derivation is a pure function of its inputs. Nothing here reads or
//! writes storage.

use super::account::AccountId;
use super::word::{self, WORD_LEN};

/// Width of a sub-pointer in bytes.
pub const SUB_POINTER_LEN: usize = 30;

/// A 30-byte storage sub-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubPointer([u8; SUB_POINTER_LEN]);

impl SubPointer {
    /// The all-zero sub-pointer, used for single-cell namespaces.
    pub const ZERO: SubPointer = SubPointer([0u8; SUB_POINTER_LEN]);

    /// Low-order 30 bytes of the canonical 32-byte encoding of `value`.
    pub fn from_scalar(value: u64) -> Self {
        let word = word::encode_u64(value);
        let mut out = [0u8; SUB_POINTER_LEN];
        out.copy_from_slice(&word[WORD_LEN - SUB_POINTER_LEN..]);
        Self(out)
    }

    /// Low-order 30 bytes of the 32-byte account identifier.
    pub fn from_account(account: &AccountId) -> Self {
        let bytes = account.as_bytes();
        let mut out = [0u8; SUB_POINTER_LEN];
        out.copy_from_slice(&bytes[bytes.len() - SUB_POINTER_LEN..]);
        Self(out)
    }

    /// Byte-wise XOR compound of two sub-pointers.
    pub fn combine(&self, other: &SubPointer) -> SubPointer {
        let mut out = [0u8; SUB_POINTER_LEN];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.0[i] ^ other.0[i];
        }
        SubPointer(out)
    }

    /// Raw sub-key bytes.
    pub fn as_bytes(&self) -> &[u8; SUB_POINTER_LEN] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scalar_truncates_canonical_word() {
        let sub = SubPointer::from_scalar(0x0102_0304);
        assert!(sub.as_bytes()[..26].iter().all(|b| *b == 0));
        assert_eq!(&sub.as_bytes()[26..], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_from_account_drops_high_bytes() {
        let mut raw = [0u8; 32];
        raw[0] = 0xaa;
        raw[1] = 0xbb;
        raw[2] = 0xcc;
        raw[31] = 0x0f;
        let sub = SubPointer::from_account(&AccountId::new(raw));
        // Bytes 0 and 1 of the account fall outside the sub-pointer.
        assert_eq!(sub.as_bytes()[0], 0xcc);
        assert_eq!(sub.as_bytes()[29], 0x0f);
    }

    #[test]
    fn test_combine_is_xor() {
        let a = SubPointer::from_scalar(0b1100);
        let b = SubPointer::from_scalar(0b1010);
        let combined = a.combine(&b);
        assert_eq!(combined.as_bytes()[29], 0b0110);
        // XOR is symmetric and self-inverting.
        assert_eq!(combined, b.combine(&a));
        assert_eq!(combined.combine(&b), a);
    }

    #[test]
    fn test_combine_with_zero_is_identity() {
        let a = SubPointer::from_scalar(42);
        assert_eq!(a.combine(&SubPointer::ZERO), a);
    }
}
