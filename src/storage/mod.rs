//! Storage subsystem for vigil
//!
//! The substrate is the durable key-value collaborator the ledger runs
//! against: opaque 32-byte keys, opaque byte values, supplied by the host.
//! Layered on top of it, the multi-slot store spreads variable-length
//! payloads across fixed-width slots with a bit-exact layout (STORAGE.md §3).
//!
//! # Design Principles
//!
//! - Determinism over optimization
//! - Length-governed reads (stale slot bytes are never observed)
//! - Statically bounded loops (a payload touches at most 256 slots)
//! - Explicit failure over silent truncation

mod errors;
mod multislot;
mod substrate;

pub use errors::{StoreError, StoreResult};
pub use multislot::{
    load, store, HEADER_LEN, HEAD_SLOT_PAYLOAD, MAX_PAYLOAD, MAX_SLOTS, SLOT_LEN,
};
pub use substrate::{MemorySubstrate, StorageSubstrate};
