//! CLI module for vigil
//!
//! The host shell around the ledger:
//! - init: activate a fresh ledger snapshot
//! - exec: execute a single operation read as JSON from stdin
//! - run: serve operations line-by-line from stdin until EOF
//! - show: inspect one switch record

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{exec, init, run, run_command, serve, show, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_requests, write_error, write_json, write_response};
