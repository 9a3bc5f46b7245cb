//! Observability for the vigil host
//!
//! Per OBSERVABILITY.md:
//! - Structured logs (JSON), one line per event
//! - Deterministic key ordering
//! - Synchronous, no buffering, no background threads
//! - Read-only: logging never affects ledger execution
//!
//! The ledger core itself never logs; it returns values and emits typed
//! events. The host logs at its edges (boot, snapshot, each dispatched
//! operation) and bridges committed lifecycle events into the log
//! stream here.

mod logger;

pub use logger::{Logger, Severity};

use crate::ledger::LedgerEvent;

/// Log one committed lifecycle event with its fields.
pub fn log_ledger_event(event: &LedgerEvent) {
    let fields = event.log_fields();
    let borrowed: Vec<(&str, &str)> = fields
        .iter()
        .map(|(name, value)| (*name, value.as_str()))
        .collect();
    Logger::info(event.kind(), &borrowed);
}
