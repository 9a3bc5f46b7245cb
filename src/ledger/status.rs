//! Switch lifecycle status

use std::fmt;

/// Lifecycle status of one switch record.
///
/// CANCELLED is declared wire surface: reads and the trigger precondition
/// recognize it, but no operation currently writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchStatus {
    Active,
    Triggered,
    Cancelled,
}

impl SwitchStatus {
    /// Canonical storage encoding. Zero is reserved for "never written" and
    /// is rejected on decode.
    pub fn encode(self) -> u64 {
        match self {
            SwitchStatus::Active => 1,
            SwitchStatus::Triggered => 2,
            SwitchStatus::Cancelled => 3,
        }
    }

    /// Decode a stored status value.
    pub fn decode(raw: u64) -> Option<SwitchStatus> {
        match raw {
            1 => Some(SwitchStatus::Active),
            2 => Some(SwitchStatus::Triggered),
            3 => Some(SwitchStatus::Cancelled),
            _ => None,
        }
    }

    /// Uppercase name for logs and API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchStatus::Active => "ACTIVE",
            SwitchStatus::Triggered => "TRIGGERED",
            SwitchStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for SwitchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
