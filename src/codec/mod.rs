//! Deterministic byte-level codecs for the ledger
//!
//! Everything consensus-visible is encoded by hand at fixed width.
//! Per STORAGE.md, the codec layer is pure: identical inputs produce
//! identical bytes on every execution, on every rebuild.

mod account;
mod key;
mod subpointer;
pub mod word;

pub use account::{AccountId, ACCOUNT_LEN};
pub use key::{StorageKey, KEY_LEN};
pub use subpointer::{SubPointer, SUB_POINTER_LEN};
