//! CLI-specific error types
//!
//! Host-level failures only; operation aborts travel inside the JSON
//! protocol, not through these.

use std::fmt;
use std::io;

use crate::snapshot::SnapshotError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Ledger snapshot already exists
    AlreadyInitialized,
    /// Ledger snapshot missing
    NotInitialized,
    /// Snapshot read or write failed
    SnapshotError,
    /// Request object missing host fields
    BadRequest,
}

impl CliErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "VIGIL_CLI_CONFIG_ERROR",
            Self::IoError => "VIGIL_CLI_IO_ERROR",
            Self::AlreadyInitialized => "VIGIL_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "VIGIL_CLI_NOT_INITIALIZED",
            Self::SnapshotError => "VIGIL_CLI_SNAPSHOT_ERROR",
            Self::BadRequest => "VIGIL_CLI_BAD_REQUEST",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error.
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error.
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Ledger already activated.
    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Ledger snapshot already exists",
        )
    }

    /// Ledger not yet activated.
    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Ledger snapshot not found. Run 'vigil init' first.",
        )
    }

    /// Snapshot layer failure.
    pub fn snapshot_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::SnapshotError, msg)
    }

    /// Request missing host fields.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BadRequest, msg)
    }

    /// Get the error code.
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<SnapshotError> for CliError {
    fn from(e: SnapshotError) -> Self {
        Self::snapshot_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
