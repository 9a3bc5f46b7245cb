//! vigil - a strict, deterministic dead man's switch ledger
//!
//! One deployable unit managing an unbounded collection of independent
//! switch records: an owner keeps a heartbeat alive with checkins; once
//! the heartbeat lapses anyone may trigger the switch; the owner has a
//! grace window to cancel; after that the stored decryption key is
//! released to readers.

pub mod api;
pub mod cli;
pub mod codec;
pub mod ledger;
pub mod observability;
pub mod snapshot;
pub mod storage;
