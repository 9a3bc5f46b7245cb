//! Execution context
//!
//! The host supplies the ambient facts of one transaction, who is calling
//! and which block is current, as an explicit value threaded through every
//! operation. Nothing in the ledger reads a clock or a global caller;
//! tests inject synthetic contexts freely.

use crate::codec::AccountId;

/// Read-only ambient context for one ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecContext {
    /// Account submitting the transaction
    pub caller: AccountId,
    /// Block height at which the transaction executes
    pub block_height: u64,
}

impl ExecContext {
    /// Build a context from host-supplied facts.
    pub fn new(caller: AccountId, block_height: u64) -> Self {
        Self {
            caller,
            block_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_plain_data() {
        let ctx = ExecContext::new(AccountId::from_name("alice"), 42);
        assert_eq!(ctx.block_height, 42);
        assert_eq!(ctx.caller, AccountId::from_name("alice"));
    }
}
