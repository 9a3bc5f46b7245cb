//! Snapshot persistence for vigil
//!
//! Between host invocations the substrate lives in a single snapshot
//! file. Per STORAGE.md §4 the format is an 8-byte magic followed by one
//! length-prefixed, checksummed record per substrate entry, in ascending
//! key order, so the same ledger state always produces the same bytes.
//!
//! # Invariants Enforced
//!
//! - Checksums on every record, verified on every read
//! - Halt-on-corruption: a damaged snapshot never loads partially
//! - Atomic replace: write to a sibling temp file, then rename

mod checksum;
mod errors;
mod reader;
mod record;
mod writer;

pub use checksum::compute_checksum;
pub use errors::{SnapshotError, SnapshotErrorCode, SnapshotResult};
pub use reader::SnapshotReader;
pub use record::SnapshotRecord;
pub use writer::SnapshotWriter;

/// Magic bytes opening every snapshot file.
pub const SNAPSHOT_MAGIC: &[u8; 8] = b"VGLSNAP1";
