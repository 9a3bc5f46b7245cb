//! Dispatch Surface Tests
//!
//! The table is the whole operation surface: all fourteen operations
//! route, writes report success booleans, events ride along in the
//! response, and everything else is rejected at the boundary.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};

use vigil::api::{dispatch, OperationKind, DISPATCH_TABLE};
use vigil::codec::AccountId;
use vigil::ledger::{ExecContext, SwitchLedger};
use vigil::storage::MemorySubstrate;

fn fresh_ledger() -> SwitchLedger {
    SwitchLedger::deploy(Box::new(MemorySubstrate::new())).unwrap()
}

fn ctx(name: &str, block: u64) -> ExecContext {
    ExecContext::new(AccountId::from_name(name), block)
}

fn hex(name: &str) -> String {
    AccountId::from_name(name).to_hex()
}

fn exec(ledger: &mut SwitchLedger, caller: &str, block: u64, request: Value) -> Value {
    let outcome = dispatch(ledger, &ctx(caller, block), &request);
    outcome.response
}

#[test]
fn test_every_table_entry_routes_and_answers() {
    let mut ledger = fresh_ledger();

    // create_switch
    let response = exec(
        &mut ledger,
        "alice",
        100,
        json!({"op": "create_switch", "beneficiary": hex("heir"), "interval": 10, "grace_period": 5}),
    );
    assert_eq!(response["status"], "ok");
    assert_eq!(response["data"]["success"], true);
    assert_eq!(response["data"]["switch_id"], 1);

    // checkin
    let response = exec(&mut ledger, "alice", 101, json!({"op": "checkin", "switch_id": 1}));
    assert_eq!(response["data"]["success"], true);
    assert_eq!(response["events"][0]["event"], "CHECKED_IN");

    // store_data / store_decryption_key
    let response = exec(
        &mut ledger,
        "alice",
        102,
        json!({"op": "store_data", "switch_id": 1, "chunk_index": 0, "data": BASE64.encode(b"chunk")}),
    );
    assert_eq!(response["data"]["success"], true);
    let response = exec(
        &mut ledger,
        "alice",
        102,
        json!({"op": "store_decryption_key", "switch_id": 1, "key": BASE64.encode(b"key")}),
    );
    assert_eq!(response["data"]["success"], true);
    // store_decryption_key emits no event.
    assert_eq!(response["events"].as_array().unwrap().len(), 0);

    // update_beneficiary / update_interval
    let response = exec(
        &mut ledger,
        "alice",
        103,
        json!({"op": "update_beneficiary", "switch_id": 1, "new_beneficiary": hex("new-heir")}),
    );
    assert_eq!(response["events"][0]["event"], "BENEFICIARY_UPDATED");
    let response = exec(
        &mut ledger,
        "alice",
        103,
        json!({"op": "update_interval", "switch_id": 1, "new_interval": 8}),
    );
    assert_eq!(response["data"]["success"], true);

    // Reads.
    let response = exec(&mut ledger, "anyone", 104, json!({"op": "get_switch", "switch_id": 1}));
    assert_eq!(response["data"]["status"], "ACTIVE");
    assert_eq!(response["data"]["beneficiary"], hex("new-heir"));

    let response = exec(
        &mut ledger,
        "anyone",
        104,
        json!({"op": "get_data", "switch_id": 1, "chunk_index": 0}),
    );
    assert_eq!(response["data"]["data"], BASE64.encode(b"chunk"));

    let response = exec(&mut ledger, "anyone", 104, json!({"op": "get_switch_count"}));
    assert_eq!(response["data"]["count"], 1);

    let response = exec(&mut ledger, "anyone", 104, json!({"op": "is_expired", "switch_id": 1}));
    assert_eq!(response["data"]["expired"], false);

    let response = exec(
        &mut ledger,
        "anyone",
        104,
        json!({"op": "get_switches_by_owner", "owner": hex("alice")}),
    );
    assert_eq!(response["data"]["count"], 1);
    assert_eq!(response["data"]["switch_ids"][0], 1);

    // trigger / get_decryption_key / cancel. Interval is 8, last checkin
    // was at 101: expired from block 110 on.
    let response = exec(&mut ledger, "watcher", 110, json!({"op": "trigger", "switch_id": 1}));
    assert_eq!(response["status"], "ok");
    assert_eq!(response["events"][0]["event"], "SWITCH_TRIGGERED");

    let response = exec(
        &mut ledger,
        "anyone",
        110,
        json!({"op": "get_decryption_key", "switch_id": 1}),
    );
    assert_eq!(response["data"]["key"], BASE64.encode(b"key"));

    let response = exec(&mut ledger, "alice", 112, json!({"op": "cancel", "switch_id": 1}));
    assert_eq!(response["data"]["success"], true);
    assert_eq!(response["events"][0]["event"], "SWITCH_CANCELLED");
}

#[test]
fn test_table_covers_exactly_the_public_surface() {
    let names: Vec<&str> = DISPATCH_TABLE.iter().map(|spec| spec.name).collect();
    assert_eq!(
        names,
        vec![
            "create_switch",
            "checkin",
            "store_data",
            "store_decryption_key",
            "trigger",
            "cancel",
            "update_beneficiary",
            "update_interval",
            "get_switch",
            "get_data",
            "get_decryption_key",
            "get_switch_count",
            "is_expired",
            "get_switches_by_owner",
        ]
    );
    let reads = DISPATCH_TABLE
        .iter()
        .filter(|spec| spec.kind == OperationKind::Read)
        .count();
    assert_eq!(reads, 6);
}

#[test]
fn test_rejections_carry_stable_codes() {
    let mut ledger = fresh_ledger();

    let response = exec(&mut ledger, "alice", 1, json!({"op": "get_switch", "switch_id": 1}));
    assert_eq!(response["status"], "error");
    assert_eq!(response["code"], "ERR_NO_SUCH_SWITCH");

    let response = exec(&mut ledger, "alice", 1, json!({"op": "self_destruct"}));
    assert_eq!(response["code"], "ERR_UNKNOWN_OPERATION");

    let response = exec(&mut ledger, "alice", 1, json!({"not_op": true}));
    assert_eq!(response["code"], "ERR_MALFORMED_REQUEST");

    let response = exec(&mut ledger, "alice", 1, json!({"op": "checkin"}));
    assert_eq!(response["code"], "ERR_INVALID_ARGUMENTS");
}

#[test]
fn test_rejected_writes_change_nothing() {
    let mut ledger = fresh_ledger();
    exec(
        &mut ledger,
        "alice",
        100,
        json!({"op": "create_switch", "beneficiary": hex("heir"), "interval": 10, "grace_period": 5}),
    );

    // Mallory's checkin is rejected and emits nothing.
    let response = exec(&mut ledger, "mallory", 105, json!({"op": "checkin", "switch_id": 1}));
    assert_eq!(response["code"], "ERR_NOT_OWNER");

    // Alice's next committed operation carries only its own event.
    let response = exec(&mut ledger, "alice", 106, json!({"op": "checkin", "switch_id": 1}));
    let events = response["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["block_height"], 106);
}
