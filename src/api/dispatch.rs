//! Operation dispatch table
//!
//! Routing is an explicit, statically-declared table mapping operation
//! name to kind and handler. Each handler decodes its own arguments,
//! calls the state machine, and encodes the result; the table is the
//! single authority on which operations exist.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

use crate::ledger::{ExecContext, LedgerError, LedgerEvent, SwitchLedger, SwitchRecord};

use super::operation::{
    ChunkArgs, CreateSwitchArgs, OwnerArgs, StoreDataArgs, StoreKeyArgs, SwitchIdArgs,
    UpdateBeneficiaryArgs, UpdateIntervalArgs,
};

/// Whether an operation mutates the ledger. The host snapshots the
/// substrate only after committed writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Write,
    Read,
}

/// Errors raised at the dispatch boundary, before or during an operation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request is not an object or carries no `op` field
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// `op` names no operation in the table
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    /// Arguments fail to decode
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The operation itself aborted
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl DispatchError {
    /// Stable code for the host protocol and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "ERR_MALFORMED_REQUEST",
            Self::UnknownOperation(_) => "ERR_UNKNOWN_OPERATION",
            Self::InvalidArguments(_) => "ERR_INVALID_ARGUMENTS",
            Self::Ledger(e) => e.tag(),
        }
    }
}

type Handler = fn(&mut SwitchLedger, &ExecContext, &Value) -> Result<Value, DispatchError>;

/// One row of the dispatch table.
pub struct OperationSpec {
    pub name: &'static str,
    pub kind: OperationKind,
    handler: Handler,
}

/// The complete operation surface, in declaration order.
pub static DISPATCH_TABLE: &[OperationSpec] = &[
    OperationSpec {
        name: "create_switch",
        kind: OperationKind::Write,
        handler: create_switch,
    },
    OperationSpec {
        name: "checkin",
        kind: OperationKind::Write,
        handler: checkin,
    },
    OperationSpec {
        name: "store_data",
        kind: OperationKind::Write,
        handler: store_data,
    },
    OperationSpec {
        name: "store_decryption_key",
        kind: OperationKind::Write,
        handler: store_decryption_key,
    },
    OperationSpec {
        name: "trigger",
        kind: OperationKind::Write,
        handler: trigger,
    },
    OperationSpec {
        name: "cancel",
        kind: OperationKind::Write,
        handler: cancel,
    },
    OperationSpec {
        name: "update_beneficiary",
        kind: OperationKind::Write,
        handler: update_beneficiary,
    },
    OperationSpec {
        name: "update_interval",
        kind: OperationKind::Write,
        handler: update_interval,
    },
    OperationSpec {
        name: "get_switch",
        kind: OperationKind::Read,
        handler: get_switch,
    },
    OperationSpec {
        name: "get_data",
        kind: OperationKind::Read,
        handler: get_data,
    },
    OperationSpec {
        name: "get_decryption_key",
        kind: OperationKind::Read,
        handler: get_decryption_key,
    },
    OperationSpec {
        name: "get_switch_count",
        kind: OperationKind::Read,
        handler: get_switch_count,
    },
    OperationSpec {
        name: "is_expired",
        kind: OperationKind::Read,
        handler: is_expired,
    },
    OperationSpec {
        name: "get_switches_by_owner",
        kind: OperationKind::Read,
        handler: get_switches_by_owner,
    },
];

/// What one dispatched request came to.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// Operation name as requested (empty when absent)
    pub op: String,
    /// Table kind; `None` when the name routed nowhere
    pub kind: Option<OperationKind>,
    pub ok: bool,
    /// Abort code on failure
    pub error_code: Option<&'static str>,
    /// Events the operation committed, in emission order
    pub events: Vec<LedgerEvent>,
    /// Full JSON response for the host channel
    pub response: Value,
}

/// Route one request through the table.
///
/// On success, events emitted by the operation are drained from the
/// ledger and included in the response; on failure nothing was written
/// and nothing is drained.
pub fn dispatch(ledger: &mut SwitchLedger, ctx: &ExecContext, request: &Value) -> DispatchOutcome {
    let op = request
        .get("op")
        .and_then(Value::as_str)
        .map(str::to_string);

    let op_name = match op {
        Some(name) => name,
        None => {
            let err = DispatchError::Malformed("request carries no 'op' field".to_string());
            return failure(String::new(), None, &err);
        }
    };

    let spec = match DISPATCH_TABLE.iter().find(|spec| spec.name == op_name) {
        Some(spec) => spec,
        None => {
            let err = DispatchError::UnknownOperation(op_name.clone());
            return failure(op_name, None, &err);
        }
    };

    match (spec.handler)(ledger, ctx, request) {
        Ok(data) => {
            let events = ledger.take_events();
            let event_json: Vec<Value> = events.iter().map(|event| event.to_json()).collect();
            DispatchOutcome {
                op: op_name.clone(),
                kind: Some(spec.kind),
                ok: true,
                error_code: None,
                events,
                response: json!({
                    "status": "ok",
                    "op": op_name,
                    "data": data,
                    "events": event_json,
                }),
            }
        }
        Err(err) => failure(op_name, Some(spec.kind), &err),
    }
}

fn failure(op: String, kind: Option<OperationKind>, err: &DispatchError) -> DispatchOutcome {
    DispatchOutcome {
        op: op.clone(),
        kind,
        ok: false,
        error_code: Some(err.code()),
        events: Vec::new(),
        response: json!({
            "status": "error",
            "op": op,
            "code": err.code(),
            "message": err.to_string(),
        }),
    }
}

fn decode<T: DeserializeOwned>(request: &Value) -> Result<T, DispatchError> {
    serde_json::from_value(request.clone())
        .map_err(|e| DispatchError::InvalidArguments(e.to_string()))
}

fn decode_base64(field: &'static str, encoded: &str) -> Result<Vec<u8>, DispatchError> {
    BASE64
        .decode(encoded)
        .map_err(|e| DispatchError::InvalidArguments(format!("{} is not valid base64: {}", field, e)))
}

/// JSON shape of a full switch record, shared by `get_switch` and the
/// CLI's show command.
pub fn record_to_json(record: &SwitchRecord) -> Value {
    json!({
        "switch_id": record.switch_id,
        "owner": record.owner.to_hex(),
        "beneficiary": record.beneficiary.to_hex(),
        "interval": record.interval,
        "grace_period": record.grace_period,
        "last_checkin": record.last_checkin,
        "status": record.status.as_str(),
        "trigger_block": record.trigger_block,
        "chunk_count": record.chunk_count,
    })
}

// =============================================================================
// Handlers
// =============================================================================

fn create_switch(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: CreateSwitchArgs = decode(request)?;
    let switch_id = ledger.create_switch(ctx, args.beneficiary, args.interval, args.grace_period)?;
    Ok(json!({"success": true, "switch_id": switch_id}))
}

fn checkin(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: SwitchIdArgs = decode(request)?;
    ledger.checkin(ctx, args.switch_id)?;
    Ok(json!({"success": true}))
}

fn store_data(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: StoreDataArgs = decode(request)?;
    let data = decode_base64("data", &args.data)?;
    ledger.store_data(ctx, args.switch_id, args.chunk_index, &data)?;
    Ok(json!({"success": true}))
}

fn store_decryption_key(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: StoreKeyArgs = decode(request)?;
    let key = decode_base64("key", &args.key)?;
    ledger.store_decryption_key(ctx, args.switch_id, &key)?;
    Ok(json!({"success": true}))
}

fn trigger(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: SwitchIdArgs = decode(request)?;
    ledger.trigger(ctx, args.switch_id)?;
    Ok(json!({"success": true}))
}

fn cancel(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: SwitchIdArgs = decode(request)?;
    ledger.cancel(ctx, args.switch_id)?;
    Ok(json!({"success": true}))
}

fn update_beneficiary(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: UpdateBeneficiaryArgs = decode(request)?;
    ledger.update_beneficiary(ctx, args.switch_id, args.new_beneficiary)?;
    Ok(json!({"success": true}))
}

fn update_interval(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: UpdateIntervalArgs = decode(request)?;
    ledger.update_interval(ctx, args.switch_id, args.new_interval)?;
    Ok(json!({"success": true}))
}

fn get_switch(
    ledger: &mut SwitchLedger,
    _ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: SwitchIdArgs = decode(request)?;
    let record = ledger.get_switch(args.switch_id)?;
    Ok(record_to_json(&record))
}

fn get_data(
    ledger: &mut SwitchLedger,
    _ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: ChunkArgs = decode(request)?;
    let data = ledger.get_data(args.switch_id, args.chunk_index)?;
    Ok(json!({"data": BASE64.encode(data)}))
}

fn get_decryption_key(
    ledger: &mut SwitchLedger,
    _ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: SwitchIdArgs = decode(request)?;
    let key = ledger.get_decryption_key(args.switch_id)?;
    Ok(json!({"key": BASE64.encode(key)}))
}

fn get_switch_count(
    ledger: &mut SwitchLedger,
    _ctx: &ExecContext,
    _request: &Value,
) -> Result<Value, DispatchError> {
    Ok(json!({"count": ledger.get_switch_count()?}))
}

fn is_expired(
    ledger: &mut SwitchLedger,
    ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: SwitchIdArgs = decode(request)?;
    Ok(json!({"expired": ledger.is_expired(ctx, args.switch_id)?}))
}

fn get_switches_by_owner(
    ledger: &mut SwitchLedger,
    _ctx: &ExecContext,
    request: &Value,
) -> Result<Value, DispatchError> {
    let args: OwnerArgs = decode(request)?;
    let owned = ledger.get_switches_by_owner(&args.owner)?;
    Ok(json!({"count": owned.total, "switch_ids": owned.switch_ids}))
}
