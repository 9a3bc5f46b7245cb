//! Host-facing operation surface
//!
//! Per CONTRACT.md §4, the host speaks JSON: one request object in, one
//! response object out. This module decodes requests into typed argument
//! structs, routes them through the statically-declared dispatch table,
//! and encodes results and emitted events back to JSON. Byte payloads
//! travel base64-encoded; account identifiers travel as 64-character hex.

mod dispatch;
mod operation;

pub use dispatch::{
    dispatch, record_to_json, DispatchError, DispatchOutcome, OperationKind, DISPATCH_TABLE,
};
pub use operation::{
    ChunkArgs, CreateSwitchArgs, OwnerArgs, StoreDataArgs, StoreKeyArgs, SwitchIdArgs,
    UpdateBeneficiaryArgs, UpdateIntervalArgs,
};
