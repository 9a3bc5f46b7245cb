//! Snapshot error types following ERRORS.md
//!
//! Error codes:
//! - VIGIL_SNAPSHOT_IO_ERROR (ERROR severity)
//! - VIGIL_SNAPSHOT_NOT_FOUND (ERROR severity)
//! - VIGIL_SNAPSHOT_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Snapshot error codes as defined in ERRORS.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotErrorCode {
    /// Filesystem failure while reading or writing
    IoError,
    /// No snapshot at the configured path
    NotFound,
    /// Snapshot bytes fail magic, framing or checksum validation
    Corruption,
}

impl SnapshotErrorCode {
    /// Returns the string code as defined in ERRORS.md.
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotErrorCode::IoError => "VIGIL_SNAPSHOT_IO_ERROR",
            SnapshotErrorCode::NotFound => "VIGIL_SNAPSHOT_NOT_FOUND",
            SnapshotErrorCode::Corruption => "VIGIL_SNAPSHOT_CORRUPTION",
        }
    }

    /// Corruption is fatal: the host must refuse to serve from a damaged
    /// snapshot rather than guess at state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SnapshotErrorCode::Corruption)
    }
}

impl fmt::Display for SnapshotErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Snapshot error with context.
#[derive(Debug)]
pub struct SnapshotError {
    code: SnapshotErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl SnapshotError {
    /// Filesystem failure.
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: SnapshotErrorCode::IoError,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Missing snapshot file.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: SnapshotErrorCode::NotFound,
            message: message.into(),
            source: None,
        }
    }

    /// Damaged snapshot bytes.
    pub fn corruption(message: impl Into<String>) -> Self {
        Self {
            code: SnapshotErrorCode::Corruption,
            message: message.into(),
            source: None,
        }
    }

    /// Corruption with the byte offset where validation failed.
    pub fn corruption_at_offset(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            code: SnapshotErrorCode::Corruption,
            message: format!("{} (byte offset {})", reason.into(), offset),
            source: None,
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> SnapshotErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the host must halt rather than continue.
    pub fn is_fatal(&self) -> bool {
        self.code.is_fatal()
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
