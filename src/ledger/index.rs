//! Ownership index
//!
//! Per-owner, append-only list of the switch identifiers an account has
//! created. Entries are keyed by the XOR compound of the owner and the
//! list position; the count cell is keyed by the owner alone. Nothing is
//! ever removed: a switch stays in its creator's list through every
//! status transition.

use crate::codec::{AccountId, SubPointer};
use crate::storage::StorageSubstrate;

use super::errors::{LedgerError, LedgerResult};
use super::maps::{OWNER_COUNT, OWNER_INDEX};

/// Upper bound on identifiers returned by a single list query, so the
/// response cost stays statically bounded however many switches an owner
/// has created.
pub const MAX_OWNER_QUERY_RESULTS: usize = 100;

/// Record `switch_id` as the next entry in `owner`'s list.
///
/// The state machine calls this exactly once per switch, at creation;
/// calling it twice for the same switch would duplicate the entry.
pub(crate) fn append(
    substrate: &mut dyn StorageSubstrate,
    owner: &AccountId,
    switch_id: u64,
) -> LedgerResult<()> {
    let owner_sub = SubPointer::from_account(owner);
    let count = OWNER_COUNT.get(substrate, owner_sub)?;
    let next = count.checked_add(1).ok_or(LedgerError::ArithmeticOverflow)?;

    let entry_sub = owner_sub.combine(&SubPointer::from_scalar(count));
    OWNER_INDEX.put(substrate, entry_sub, switch_id);
    OWNER_COUNT.put(substrate, owner_sub, next);
    Ok(())
}

/// Number of switches `owner` has created.
pub(crate) fn count(substrate: &dyn StorageSubstrate, owner: &AccountId) -> LedgerResult<u64> {
    OWNER_COUNT.get(substrate, SubPointer::from_account(owner))
}

/// The switch identifier at position `position` in `owner`'s list.
pub(crate) fn at(
    substrate: &dyn StorageSubstrate,
    owner: &AccountId,
    position: u64,
) -> LedgerResult<u64> {
    let owner_sub = SubPointer::from_account(owner);
    let entry_sub = owner_sub.combine(&SubPointer::from_scalar(position));
    OWNER_INDEX.get(substrate, entry_sub)
}

/// Total count plus the first `MAX_OWNER_QUERY_RESULTS` identifiers.
pub(crate) fn list(
    substrate: &dyn StorageSubstrate,
    owner: &AccountId,
) -> LedgerResult<(u64, Vec<u64>)> {
    let total = count(substrate, owner)?;
    let take = total.min(MAX_OWNER_QUERY_RESULTS as u64);
    let mut ids = Vec::with_capacity(take as usize);
    for position in 0..take {
        ids.push(at(substrate, owner, position)?);
    }
    Ok((total, ids))
}
