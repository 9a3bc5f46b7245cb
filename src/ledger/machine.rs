//! Switch state machine
//!
//! The public operation surface of the ledger: eight mutating operations
//! and six reads, each gated by explicit validation (CONTRACT.md §2).
//!
//! # Commit Discipline
//!
//! Every operation re-validates its preconditions (existence, ownership,
//! status, deadlines, payload shape) from durable storage at entry, and
//! performs all checked arithmetic, before its first substrate write. An
//! error return therefore leaves the substrate and the event buffer
//! exactly as they were: there is no partial-failure state.
//!
//! # Execution Model
//!
//! One operation at a time, run to completion; the host serializes
//! transactions into a total order before the ledger sees them. No locks,
//! no retries. Loop bounds are fixed constants so every operation's cost
//! is statically bounded.

use crate::codec::{AccountId, SubPointer};
use crate::storage::{self, StorageSubstrate, MAX_PAYLOAD};

use super::context::ExecContext;
use super::errors::{LedgerError, LedgerResult};
use super::events::LedgerEvent;
use super::index;
use super::maps::{
    BENEFICIARY, CHUNK_COUNT, COUNTER_SUB, GRACE_PERIOD, INTERVAL, LAST_CHECKIN, NEXT_SWITCH_ID,
    OWNER, STATUS, TRIGGER_BLOCK,
};
use super::namespace::Namespace;
use super::status::SwitchStatus;

/// One switch record, fully decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRecord {
    pub switch_id: u64,
    pub owner: AccountId,
    pub beneficiary: AccountId,
    pub interval: u64,
    pub grace_period: u64,
    pub last_checkin: u64,
    pub status: SwitchStatus,
    pub trigger_block: u64,
    pub chunk_count: u64,
}

/// Result of an owner list query: the full count plus a bounded prefix of
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerSwitches {
    pub total: u64,
    pub switch_ids: Vec<u64>,
}

/// The dead man's switch ledger.
///
/// Owns the storage substrate for the duration of a host session and
/// buffers the events emitted by committed operations until the host
/// drains them with [`SwitchLedger::take_events`].
pub struct SwitchLedger {
    substrate: Box<dyn StorageSubstrate>,
    events: Vec<LedgerEvent>,
}

impl std::fmt::Debug for SwitchLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchLedger")
            .field("substrate", &"<dyn StorageSubstrate>")
            .field("events", &self.events)
            .finish()
    }
}

impl SwitchLedger {
    /// Wrap an already-activated substrate.
    pub fn new(substrate: Box<dyn StorageSubstrate>) -> Self {
        Self {
            substrate,
            events: Vec::new(),
        }
    }

    /// First-activation hook: reserve identifier 0 by starting the counter
    /// at 1. Fails if the substrate already carries an activated ledger.
    pub fn deploy(substrate: Box<dyn StorageSubstrate>) -> LedgerResult<Self> {
        let mut ledger = Self::new(substrate);
        if NEXT_SWITCH_ID.get(ledger.substrate.as_ref(), COUNTER_SUB)? != 0 {
            return Err(LedgerError::AlreadyInitialized);
        }
        NEXT_SWITCH_ID.put(ledger.substrate.as_mut(), COUNTER_SUB, 1);
        Ok(ledger)
    }

    /// Events emitted by operations committed since the last drain.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view of the substrate, for snapshot persistence.
    pub fn substrate(&self) -> &dyn StorageSubstrate {
        self.substrate.as_ref()
    }

    /// Give the substrate back to the host.
    pub fn into_substrate(self) -> Box<dyn StorageSubstrate> {
        self.substrate
    }

    // =========================================================================
    // Mutating operations
    // =========================================================================

    /// Create a new switch owned by the caller.
    pub fn create_switch(
        &mut self,
        ctx: &ExecContext,
        beneficiary: AccountId,
        interval: u64,
        grace_period: u64,
    ) -> LedgerResult<u64> {
        if beneficiary.is_zero() {
            return Err(LedgerError::ZeroBeneficiary);
        }
        if interval == 0 {
            return Err(LedgerError::ZeroInterval);
        }
        if grace_period == 0 {
            return Err(LedgerError::ZeroGracePeriod);
        }

        let switch_id = self.next_switch_id()?;
        let bumped = switch_id
            .checked_add(1)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        // Index first: its count arithmetic is the last fallible step, so
        // any abort still happens before the first write.
        index::append(self.substrate.as_mut(), &ctx.caller, switch_id)?;

        let sub = SubPointer::from_scalar(switch_id);
        OWNER.put(self.substrate.as_mut(), sub, &ctx.caller);
        BENEFICIARY.put(self.substrate.as_mut(), sub, &beneficiary);
        INTERVAL.put(self.substrate.as_mut(), sub, interval);
        GRACE_PERIOD.put(self.substrate.as_mut(), sub, grace_period);
        LAST_CHECKIN.put(self.substrate.as_mut(), sub, ctx.block_height);
        STATUS.put(self.substrate.as_mut(), sub, SwitchStatus::Active.encode());
        TRIGGER_BLOCK.put(self.substrate.as_mut(), sub, 0);
        CHUNK_COUNT.put(self.substrate.as_mut(), sub, 0);
        NEXT_SWITCH_ID.put(self.substrate.as_mut(), COUNTER_SUB, bumped);

        self.events.push(LedgerEvent::SwitchCreated {
            switch_id,
            owner: ctx.caller,
            beneficiary,
        });
        Ok(switch_id)
    }

    /// Reset the heartbeat deadline of an active switch.
    pub fn checkin(&mut self, ctx: &ExecContext, switch_id: u64) -> LedgerResult<()> {
        let sub = self.require_exists(switch_id)?;
        self.require_owner(sub, ctx)?;
        self.require_active(sub)?;

        LAST_CHECKIN.put(self.substrate.as_mut(), sub, ctx.block_height);
        self.events.push(LedgerEvent::CheckedIn {
            switch_id,
            block_height: ctx.block_height,
        });
        Ok(())
    }

    /// Store one data chunk. Writing at or past the current chunk count
    /// raises the count to `chunk_index + 1`; the count never decreases.
    pub fn store_data(
        &mut self,
        ctx: &ExecContext,
        switch_id: u64,
        chunk_index: u32,
        data: &[u8],
    ) -> LedgerResult<()> {
        let sub = self.require_exists(switch_id)?;
        self.require_owner(sub, ctx)?;
        self.require_active(sub)?;
        if data.is_empty() {
            return Err(LedgerError::EmptyPayload);
        }
        if data.len() > MAX_PAYLOAD {
            return Err(LedgerError::CapacityExceeded {
                len: data.len(),
                max: MAX_PAYLOAD,
            });
        }

        let count = CHUNK_COUNT.get(self.substrate.as_ref(), sub)?;
        let past_end = u64::from(chunk_index)
            .checked_add(1)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        let chunk_sub = sub.combine(&SubPointer::from_scalar(u64::from(chunk_index)));
        storage::store(
            self.substrate.as_mut(),
            Namespace::DataChunk.key(chunk_sub),
            data,
        )?;
        if past_end > count {
            CHUNK_COUNT.put(self.substrate.as_mut(), sub, past_end);
        }

        self.events.push(LedgerEvent::DataStored {
            switch_id,
            chunk_index,
        });
        Ok(())
    }

    /// Store or replace the encrypted decryption key.
    pub fn store_decryption_key(
        &mut self,
        ctx: &ExecContext,
        switch_id: u64,
        key: &[u8],
    ) -> LedgerResult<()> {
        let sub = self.require_exists(switch_id)?;
        self.require_owner(sub, ctx)?;
        self.require_active(sub)?;
        if key.is_empty() {
            return Err(LedgerError::EmptyPayload);
        }
        if key.len() > MAX_PAYLOAD {
            return Err(LedgerError::CapacityExceeded {
                len: key.len(),
                max: MAX_PAYLOAD,
            });
        }

        storage::store(
            self.substrate.as_mut(),
            Namespace::EncryptedKey.key(sub),
            key,
        )?;
        Ok(())
    }

    /// Fire a switch whose heartbeat deadline has passed. Deliberately
    /// permissionless: an absent owner must not be able to prevent it.
    pub fn trigger(&mut self, ctx: &ExecContext, switch_id: u64) -> LedgerResult<()> {
        let sub = self.require_exists(switch_id)?;
        match self.status_of(sub)? {
            SwitchStatus::Triggered => return Err(LedgerError::AlreadyTriggered),
            SwitchStatus::Cancelled => return Err(LedgerError::SwitchCancelled),
            SwitchStatus::Active => {}
        }

        let last_checkin = LAST_CHECKIN.get(self.substrate.as_ref(), sub)?;
        let interval = INTERVAL.get(self.substrate.as_ref(), sub)?;
        let deadline = last_checkin
            .checked_add(interval)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        if ctx.block_height <= deadline {
            return Err(LedgerError::DeadlineNotReached {
                deadline,
                current: ctx.block_height,
            });
        }

        let beneficiary = BENEFICIARY.get(self.substrate.as_ref(), sub)?;
        STATUS.put(
            self.substrate.as_mut(),
            sub,
            SwitchStatus::Triggered.encode(),
        );
        TRIGGER_BLOCK.put(self.substrate.as_mut(), sub, ctx.block_height);

        self.events.push(LedgerEvent::SwitchTriggered {
            switch_id,
            beneficiary,
            block_height: ctx.block_height,
        });
        Ok(())
    }

    /// Owner veto of a trigger, allowed until the grace window closes.
    /// Restores ACTIVE and counts as a fresh checkin.
    pub fn cancel(&mut self, ctx: &ExecContext, switch_id: u64) -> LedgerResult<()> {
        let sub = self.require_exists(switch_id)?;
        self.require_owner(sub, ctx)?;
        if self.status_of(sub)? != SwitchStatus::Triggered {
            return Err(LedgerError::NotTriggered);
        }

        let trigger_block = TRIGGER_BLOCK.get(self.substrate.as_ref(), sub)?;
        let grace_period = GRACE_PERIOD.get(self.substrate.as_ref(), sub)?;
        let deadline = trigger_block
            .checked_add(grace_period)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        if ctx.block_height > deadline {
            return Err(LedgerError::GraceExpired {
                deadline,
                current: ctx.block_height,
            });
        }

        STATUS.put(self.substrate.as_mut(), sub, SwitchStatus::Active.encode());
        LAST_CHECKIN.put(self.substrate.as_mut(), sub, ctx.block_height);
        TRIGGER_BLOCK.put(self.substrate.as_mut(), sub, 0);

        self.events.push(LedgerEvent::SwitchCancelled {
            switch_id,
            block_height: ctx.block_height,
        });
        Ok(())
    }

    /// Redirect an active switch to a new beneficiary.
    pub fn update_beneficiary(
        &mut self,
        ctx: &ExecContext,
        switch_id: u64,
        new_beneficiary: AccountId,
    ) -> LedgerResult<()> {
        let sub = self.require_exists(switch_id)?;
        self.require_owner(sub, ctx)?;
        self.require_active(sub)?;
        if new_beneficiary.is_zero() {
            return Err(LedgerError::ZeroBeneficiary);
        }

        BENEFICIARY.put(self.substrate.as_mut(), sub, &new_beneficiary);
        self.events.push(LedgerEvent::BeneficiaryUpdated {
            switch_id,
            new_beneficiary,
        });
        Ok(())
    }

    /// Change the heartbeat interval of an active switch.
    pub fn update_interval(
        &mut self,
        ctx: &ExecContext,
        switch_id: u64,
        new_interval: u64,
    ) -> LedgerResult<()> {
        let sub = self.require_exists(switch_id)?;
        self.require_owner(sub, ctx)?;
        self.require_active(sub)?;
        if new_interval == 0 {
            return Err(LedgerError::ZeroInterval);
        }

        INTERVAL.put(self.substrate.as_mut(), sub, new_interval);
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All scalar fields of one switch.
    pub fn get_switch(&self, switch_id: u64) -> LedgerResult<SwitchRecord> {
        let sub = self.require_exists(switch_id)?;
        Ok(SwitchRecord {
            switch_id,
            owner: OWNER.get(self.substrate.as_ref(), sub)?,
            beneficiary: BENEFICIARY.get(self.substrate.as_ref(), sub)?,
            interval: INTERVAL.get(self.substrate.as_ref(), sub)?,
            grace_period: GRACE_PERIOD.get(self.substrate.as_ref(), sub)?,
            last_checkin: LAST_CHECKIN.get(self.substrate.as_ref(), sub)?,
            status: self.status_of(sub)?,
            trigger_block: TRIGGER_BLOCK.get(self.substrate.as_ref(), sub)?,
            chunk_count: CHUNK_COUNT.get(self.substrate.as_ref(), sub)?,
        })
    }

    /// One data chunk. A chunk below the count that was never written (a
    /// hole) reads back as the empty payload.
    pub fn get_data(&self, switch_id: u64, chunk_index: u32) -> LedgerResult<Vec<u8>> {
        let sub = self.require_exists(switch_id)?;
        let count = CHUNK_COUNT.get(self.substrate.as_ref(), sub)?;
        if u64::from(chunk_index) >= count {
            return Err(LedgerError::ChunkOutOfBounds {
                index: chunk_index,
                count,
            });
        }
        let chunk_sub = sub.combine(&SubPointer::from_scalar(u64::from(chunk_index)));
        Ok(storage::load(
            self.substrate.as_ref(),
            Namespace::DataChunk.key(chunk_sub),
        )?)
    }

    /// The encrypted key, released only once the switch has fired.
    pub fn get_decryption_key(&self, switch_id: u64) -> LedgerResult<Vec<u8>> {
        let sub = self.require_exists(switch_id)?;
        if self.status_of(sub)? != SwitchStatus::Triggered {
            return Err(LedgerError::KeyNotAvailable);
        }
        Ok(storage::load(
            self.substrate.as_ref(),
            Namespace::EncryptedKey.key(sub),
        )?)
    }

    /// Number of switches ever created.
    pub fn get_switch_count(&self) -> LedgerResult<u64> {
        self.next_switch_id()?
            .checked_sub(1)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// Whether the heartbeat deadline has passed as of the context block.
    pub fn is_expired(&self, ctx: &ExecContext, switch_id: u64) -> LedgerResult<bool> {
        let sub = self.require_exists(switch_id)?;
        let last_checkin = LAST_CHECKIN.get(self.substrate.as_ref(), sub)?;
        let interval = INTERVAL.get(self.substrate.as_ref(), sub)?;
        let deadline = last_checkin
            .checked_add(interval)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok(ctx.block_height > deadline)
    }

    /// The caller-visible ownership index entry for `owner`.
    pub fn get_switches_by_owner(&self, owner: &AccountId) -> LedgerResult<OwnerSwitches> {
        let (total, switch_ids) = index::list(self.substrate.as_ref(), owner)?;
        Ok(OwnerSwitches { total, switch_ids })
    }

    // =========================================================================
    // Validation helpers
    // =========================================================================

    fn next_switch_id(&self) -> LedgerResult<u64> {
        let next = NEXT_SWITCH_ID.get(self.substrate.as_ref(), COUNTER_SUB)?;
        if next == 0 {
            return Err(LedgerError::NotInitialized);
        }
        Ok(next)
    }

    /// Existence is exactly `1 <= switch_id < nextSwitchId`.
    fn require_exists(&self, switch_id: u64) -> LedgerResult<SubPointer> {
        let next = self.next_switch_id()?;
        if switch_id == 0 || switch_id >= next {
            return Err(LedgerError::NoSuchSwitch(switch_id));
        }
        Ok(SubPointer::from_scalar(switch_id))
    }

    fn require_owner(&self, sub: SubPointer, ctx: &ExecContext) -> LedgerResult<()> {
        let owner = OWNER.get(self.substrate.as_ref(), sub)?;
        if owner != ctx.caller {
            return Err(LedgerError::NotOwner);
        }
        Ok(())
    }

    fn status_of(&self, sub: SubPointer) -> LedgerResult<SwitchStatus> {
        let raw = STATUS.get(self.substrate.as_ref(), sub)?;
        SwitchStatus::decode(raw).ok_or_else(|| {
            LedgerError::StorageCorruption(format!("undecodable status value {}", raw))
        })
    }

    fn require_active(&self, sub: SubPointer) -> LedgerResult<()> {
        let status = self.status_of(sub)?;
        if status != SwitchStatus::Active {
            return Err(LedgerError::NotActive { status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySubstrate;

    fn fresh_ledger() -> SwitchLedger {
        SwitchLedger::deploy(Box::new(MemorySubstrate::new())).unwrap()
    }

    fn ctx(name: &str, block: u64) -> ExecContext {
        ExecContext::new(AccountId::from_name(name), block)
    }

    #[test]
    fn test_identifiers_start_at_one_and_increment() {
        let mut ledger = fresh_ledger();
        let beneficiary = AccountId::from_name("heir");
        for expected in 1..=4u64 {
            let id = ledger
                .create_switch(&ctx("alice", 100), beneficiary, 10, 5)
                .unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(ledger.get_switch_count().unwrap(), 4);
    }

    #[test]
    fn test_existence_gate() {
        let mut ledger = fresh_ledger();
        assert_eq!(
            ledger.get_switch(1).unwrap_err(),
            LedgerError::NoSuchSwitch(1)
        );
        ledger
            .create_switch(&ctx("alice", 100), AccountId::from_name("heir"), 10, 5)
            .unwrap();
        assert!(ledger.get_switch(1).is_ok());
        assert_eq!(
            ledger.get_switch(0).unwrap_err(),
            LedgerError::NoSuchSwitch(0)
        );
        assert_eq!(
            ledger.get_switch(2).unwrap_err(),
            LedgerError::NoSuchSwitch(2)
        );
    }

    #[test]
    fn test_create_validates_arguments() {
        let mut ledger = fresh_ledger();
        let heir = AccountId::from_name("heir");
        assert_eq!(
            ledger
                .create_switch(&ctx("alice", 1), AccountId::ZERO, 10, 5)
                .unwrap_err(),
            LedgerError::ZeroBeneficiary
        );
        assert_eq!(
            ledger.create_switch(&ctx("alice", 1), heir, 0, 5).unwrap_err(),
            LedgerError::ZeroInterval
        );
        assert_eq!(
            ledger.create_switch(&ctx("alice", 1), heir, 10, 0).unwrap_err(),
            LedgerError::ZeroGracePeriod
        );
        // Nothing was created.
        assert_eq!(ledger.get_switch_count().unwrap(), 0);
        assert!(ledger.take_events().is_empty());
    }

    #[test]
    fn test_create_populates_all_fields() {
        let mut ledger = fresh_ledger();
        let heir = AccountId::from_name("heir");
        let id = ledger.create_switch(&ctx("alice", 100), heir, 10, 5).unwrap();
        let record = ledger.get_switch(id).unwrap();
        assert_eq!(record.owner, AccountId::from_name("alice"));
        assert_eq!(record.beneficiary, heir);
        assert_eq!(record.interval, 10);
        assert_eq!(record.grace_period, 5);
        assert_eq!(record.last_checkin, 100);
        assert_eq!(record.status, SwitchStatus::Active);
        assert_eq!(record.trigger_block, 0);
        assert_eq!(record.chunk_count, 0);
    }

    #[test]
    fn test_events_are_buffered_until_drained() {
        let mut ledger = fresh_ledger();
        let heir = AccountId::from_name("heir");
        ledger.create_switch(&ctx("alice", 100), heir, 10, 5).unwrap();
        ledger.checkin(&ctx("alice", 105), 1).unwrap();
        let events = ledger.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "SWITCH_CREATED");
        assert_eq!(events[1].kind(), "CHECKED_IN");
        assert!(ledger.take_events().is_empty());
    }

    #[test]
    fn test_failed_operation_emits_nothing() {
        let mut ledger = fresh_ledger();
        ledger
            .create_switch(&ctx("alice", 100), AccountId::from_name("heir"), 10, 5)
            .unwrap();
        ledger.take_events();
        assert!(ledger.checkin(&ctx("mallory", 105), 1).is_err());
        assert!(ledger.take_events().is_empty());
    }

    #[test]
    fn test_deploy_refuses_activated_substrate() {
        let ledger = fresh_ledger();
        let substrate = ledger.into_substrate();
        assert!(matches!(
            SwitchLedger::deploy(substrate),
            Err(LedgerError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_operations_require_initialization() {
        let ledger = SwitchLedger::new(Box::new(MemorySubstrate::new()));
        assert_eq!(
            ledger.get_switch_count().unwrap_err(),
            LedgerError::NotInitialized
        );
    }
}
