//! Account identifiers
//!
//! Accounts are opaque 32-byte identifiers supplied by the host. The
//! all-zero identifier is reserved: it is never a valid beneficiary and
//! doubles as the "unset" value that zero-initialized storage reads back.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Width of an account identifier in bytes.
pub const ACCOUNT_LEN: usize = 32;

/// A 32-byte account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; ACCOUNT_LEN]);

impl AccountId {
    /// The reserved all-zero identifier.
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_LEN]);

    /// Wrap raw identifier bytes.
    pub const fn new(bytes: [u8; ACCOUNT_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic identifier from a human-readable name.
    ///
    /// The CLI accepts names like `alice` and maps them through SHA-256 so
    /// that the same name addresses the same account on every invocation.
    pub fn from_name(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        let mut bytes = [0u8; ACCOUNT_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Parse a 64-character hex identifier.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != ACCOUNT_LEN * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut bytes = [0u8; ACCOUNT_LEN];
        for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self(bytes))
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_LEN] {
        &self.0
    }

    /// Whether this is the reserved zero identifier.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Lowercase hex rendering, 64 characters.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(ACCOUNT_LEN * 2);
        for b in &self.0 {
            out.push_str(&format!("{:02x}", b));
        }
        out
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccountId::from_hex(&s).ok_or_else(|| {
            de::Error::custom(format!(
                "account identifier must be {} hex characters, got '{}'",
                ACCOUNT_LEN * 2,
                s
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_deterministic() {
        let a = AccountId::from_name("alice");
        let b = AccountId::from_name("alice");
        assert_eq!(a, b);
        assert_ne!(a, AccountId::from_name("bob"));
        assert!(!a.is_zero());
    }

    #[test]
    fn test_hex_roundtrip() {
        let account = AccountId::from_name("carol");
        let parsed = AccountId::from_hex(&account.to_hex()).unwrap();
        assert_eq!(account, parsed);
    }

    #[test]
    fn test_from_hex_rejects_malformed() {
        assert!(AccountId::from_hex("abc").is_none());
        assert!(AccountId::from_hex(&"zz".repeat(32)).is_none());
        assert!(AccountId::from_hex(&"0".repeat(63)).is_none());
    }

    #[test]
    fn test_zero_is_zero() {
        assert!(AccountId::ZERO.is_zero());
        assert_eq!(AccountId::ZERO.to_hex(), "0".repeat(64));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let account = AccountId::from_name("dave");
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json, format!("\"{}\"", account.to_hex()));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }
}
