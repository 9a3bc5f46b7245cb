//! Access Control Invariant Tests
//!
//! Every scalar-mutating operation except trigger is owner-gated; trigger
//! is deliberately permissionless. Reads are open to anyone.

use vigil::codec::AccountId;
use vigil::ledger::{ExecContext, LedgerError, SwitchLedger};
use vigil::storage::MemorySubstrate;

fn ctx(name: &str, block: u64) -> ExecContext {
    ExecContext::new(AccountId::from_name(name), block)
}

/// Alice owns switch 1, created at block 100 with interval 10, grace 5,
/// one stored chunk and a stored key.
fn ledger_with_populated_switch() -> SwitchLedger {
    let mut ledger = SwitchLedger::deploy(Box::new(MemorySubstrate::new())).unwrap();
    ledger
        .create_switch(&ctx("alice", 100), AccountId::from_name("heir"), 10, 5)
        .unwrap();
    ledger
        .store_data(&ctx("alice", 100), 1, 0, b"chunk-zero")
        .unwrap();
    ledger
        .store_decryption_key(&ctx("alice", 100), 1, b"key-material")
        .unwrap();
    ledger
}

#[test]
fn test_owner_gated_operations_reject_strangers() {
    let mut ledger = ledger_with_populated_switch();
    let mallory = ctx("mallory", 105);

    assert_eq!(ledger.checkin(&mallory, 1).unwrap_err(), LedgerError::NotOwner);
    assert_eq!(
        ledger.store_data(&mallory, 1, 1, b"inject").unwrap_err(),
        LedgerError::NotOwner
    );
    assert_eq!(
        ledger
            .store_decryption_key(&mallory, 1, b"swap")
            .unwrap_err(),
        LedgerError::NotOwner
    );
    assert_eq!(
        ledger
            .update_beneficiary(&mallory, 1, AccountId::from_name("mallory"))
            .unwrap_err(),
        LedgerError::NotOwner
    );
    assert_eq!(
        ledger.update_interval(&mallory, 1, 1).unwrap_err(),
        LedgerError::NotOwner
    );
}

#[test]
fn test_cancel_is_owner_gated_even_when_triggered() {
    let mut ledger = ledger_with_populated_switch();
    ledger.trigger(&ctx("watcher", 111), 1).unwrap();
    assert_eq!(
        ledger.cancel(&ctx("mallory", 112), 1).unwrap_err(),
        LedgerError::NotOwner
    );
    // The owner still can.
    ledger.cancel(&ctx("alice", 112), 1).unwrap();
}

#[test]
fn test_ownership_check_precedes_status_check() {
    let mut ledger = ledger_with_populated_switch();
    ledger.trigger(&ctx("watcher", 111), 1).unwrap();
    // Even against a non-ACTIVE switch, a stranger sees the authorization
    // error, not the state error.
    assert_eq!(
        ledger.checkin(&ctx("mallory", 112), 1).unwrap_err(),
        LedgerError::NotOwner
    );
}

#[test]
fn test_trigger_accepts_any_caller() {
    let mut ledger = ledger_with_populated_switch();
    ledger.trigger(&ctx("mallory", 111), 1).unwrap();
}

#[test]
fn test_reads_are_open_to_anyone() {
    let mut ledger = ledger_with_populated_switch();
    assert!(ledger.get_switch(1).is_ok());
    assert_eq!(ledger.get_data(1, 0).unwrap(), b"chunk-zero".to_vec());
    assert!(ledger
        .get_switches_by_owner(&AccountId::from_name("alice"))
        .is_ok());

    ledger.trigger(&ctx("watcher", 111), 1).unwrap();
    // Once triggered, the key is readable by anyone, beneficiary or not.
    assert_eq!(ledger.get_decryption_key(1).unwrap(), b"key-material".to_vec());
}

#[test]
fn test_owner_of_one_switch_is_stranger_to_another() {
    let mut ledger = ledger_with_populated_switch();
    ledger
        .create_switch(&ctx("bob", 100), AccountId::from_name("heir"), 10, 5)
        .unwrap();
    assert_eq!(
        ledger.checkin(&ctx("bob", 101), 1).unwrap_err(),
        LedgerError::NotOwner
    );
    ledger.checkin(&ctx("bob", 101), 2).unwrap();
}
