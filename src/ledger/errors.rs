//! # Ledger Errors
//!
//! Every failed operation aborts with one of these variants and leaves the
//! substrate untouched. Per ERRORS.md, each variant maps to a stable short
//! tag surfaced to the host, grouped into four classes: validation,
//! authorization, state, and arithmetic (plus the defensive integrity
//! class for substrate bytes that fail to decode).

use thiserror::Error;

use crate::storage::StoreError;

use super::status::SwitchStatus;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Classes of the error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Authorization,
    State,
    Arithmetic,
    Integrity,
}

/// Abort reasons for ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ==================
    // Validation Errors
    // ==================
    /// Beneficiary must be a real account
    #[error("Beneficiary must be a non-zero account")]
    ZeroBeneficiary,

    /// Heartbeat interval must be positive
    #[error("Interval must be greater than zero")]
    ZeroInterval,

    /// Cancellation window must be positive
    #[error("Grace period must be greater than zero")]
    ZeroGracePeriod,

    /// Data and key payloads must carry at least one byte
    #[error("Payload must not be empty")]
    EmptyPayload,

    /// Chunk reads are bounded by the stored chunk count
    #[error("Chunk index {index} out of bounds (chunk count {count})")]
    ChunkOutOfBounds { index: u32, count: u64 },

    /// Payload larger than the multi-slot capacity
    #[error("Payload of {len} bytes exceeds the {max}-byte capacity")]
    CapacityExceeded { len: usize, max: usize },

    // ==================
    // Authorization Errors
    // ==================
    /// Owner-gated operation called by someone else
    #[error("Caller is not the switch owner")]
    NotOwner,

    // ==================
    // State Errors
    // ==================
    /// Identifier outside [1, nextSwitchId)
    #[error("Switch {0} does not exist")]
    NoSuchSwitch(u64),

    /// Operation requires ACTIVE status
    #[error("Switch is not active (status {status})")]
    NotActive { status: SwitchStatus },

    /// Trigger called on an already triggered switch
    #[error("Switch is already triggered")]
    AlreadyTriggered,

    /// Trigger called on a cancelled switch
    #[error("Switch is cancelled")]
    SwitchCancelled,

    /// Trigger called at or before the heartbeat deadline
    #[error("Heartbeat deadline not passed (deadline block {deadline}, current block {current})")]
    DeadlineNotReached { deadline: u64, current: u64 },

    /// Cancel called on a switch that is not triggered
    #[error("Switch is not triggered")]
    NotTriggered,

    /// Cancel called after the grace window closed
    #[error("Grace period expired at block {deadline} (current block {current})")]
    GraceExpired { deadline: u64, current: u64 },

    /// Key read before the switch fired
    #[error("Decryption key is not available until the switch is triggered")]
    KeyNotAvailable,

    /// Ledger used before its counter was activated
    #[error("Ledger is not initialized")]
    NotInitialized,

    /// Deployment hook ran twice
    #[error("Ledger is already initialized")]
    AlreadyInitialized,

    // ==================
    // Arithmetic Errors
    // ==================
    /// Checked addition or subtraction overflowed
    #[error("Checked arithmetic overflow")]
    ArithmeticOverflow,

    // ==================
    // Integrity Errors
    // ==================
    /// Substrate bytes that the ledger can never have written
    #[error("Storage corruption: {0}")]
    StorageCorruption(String),
}

impl LedgerError {
    /// Stable short abort tag surfaced through the host protocol.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ZeroBeneficiary => "ERR_ZERO_BENEFICIARY",
            Self::ZeroInterval => "ERR_ZERO_INTERVAL",
            Self::ZeroGracePeriod => "ERR_ZERO_GRACE_PERIOD",
            Self::EmptyPayload => "ERR_EMPTY_PAYLOAD",
            Self::ChunkOutOfBounds { .. } => "ERR_CHUNK_OUT_OF_BOUNDS",
            Self::CapacityExceeded { .. } => "ERR_CAPACITY_EXCEEDED",
            Self::NotOwner => "ERR_NOT_OWNER",
            Self::NoSuchSwitch(_) => "ERR_NO_SUCH_SWITCH",
            Self::NotActive { .. } => "ERR_NOT_ACTIVE",
            Self::AlreadyTriggered => "ERR_ALREADY_TRIGGERED",
            Self::SwitchCancelled => "ERR_SWITCH_CANCELLED",
            Self::DeadlineNotReached { .. } => "ERR_DEADLINE_NOT_REACHED",
            Self::NotTriggered => "ERR_NOT_TRIGGERED",
            Self::GraceExpired { .. } => "ERR_GRACE_EXPIRED",
            Self::KeyNotAvailable => "ERR_KEY_NOT_AVAILABLE",
            Self::NotInitialized => "ERR_NOT_INITIALIZED",
            Self::AlreadyInitialized => "ERR_ALREADY_INITIALIZED",
            Self::ArithmeticOverflow => "ERR_ARITHMETIC_OVERFLOW",
            Self::StorageCorruption(_) => "ERR_STORAGE_CORRUPTION",
        }
    }

    /// Taxonomy class of this abort reason.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ZeroBeneficiary
            | Self::ZeroInterval
            | Self::ZeroGracePeriod
            | Self::EmptyPayload
            | Self::ChunkOutOfBounds { .. }
            | Self::CapacityExceeded { .. } => ErrorCategory::Validation,
            Self::NotOwner => ErrorCategory::Authorization,
            Self::NoSuchSwitch(_)
            | Self::NotActive { .. }
            | Self::AlreadyTriggered
            | Self::SwitchCancelled
            | Self::DeadlineNotReached { .. }
            | Self::NotTriggered
            | Self::GraceExpired { .. }
            | Self::KeyNotAvailable
            | Self::NotInitialized
            | Self::AlreadyInitialized => ErrorCategory::State,
            Self::ArithmeticOverflow => ErrorCategory::Arithmetic,
            Self::StorageCorruption(_) => ErrorCategory::Integrity,
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::CapacityExceeded { len, max } => Self::CapacityExceeded { len, max },
            StoreError::KeyOverflow => Self::ArithmeticOverflow,
            StoreError::Corruption(message) => Self::StorageCorruption(message),
        }
    }
}
