//! Operation argument shapes
//!
//! One struct per distinct argument list. Each decodes straight from the
//! request object; the `op` discriminator and any host-level fields
//! (`caller`, `block`) are simply ignored by the decoders.

use serde::Deserialize;

use crate::codec::AccountId;

/// Arguments for `create_switch`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSwitchArgs {
    pub beneficiary: AccountId,
    pub interval: u64,
    pub grace_period: u64,
}

/// Arguments for every operation addressed by a bare switch identifier:
/// `checkin`, `trigger`, `cancel`, `get_switch`, `get_decryption_key`,
/// `is_expired`.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchIdArgs {
    pub switch_id: u64,
}

/// Arguments for `store_data`. `data` is base64.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreDataArgs {
    pub switch_id: u64,
    pub chunk_index: u32,
    pub data: String,
}

/// Arguments for `store_decryption_key`. `key` is base64.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreKeyArgs {
    pub switch_id: u64,
    pub key: String,
}

/// Arguments for `update_beneficiary`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBeneficiaryArgs {
    pub switch_id: u64,
    pub new_beneficiary: AccountId,
}

/// Arguments for `update_interval`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIntervalArgs {
    pub switch_id: u64,
    pub new_interval: u64,
}

/// Arguments for `get_data`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkArgs {
    pub switch_id: u64,
    pub chunk_index: u32,
}

/// Arguments for `get_switches_by_owner`.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerArgs {
    pub owner: AccountId,
}
