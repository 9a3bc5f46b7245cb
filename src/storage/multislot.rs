//! Multi-slot byte store
//!
//! Per STORAGE.md §3, a variable-length payload is spread over fixed-width
//! slots under one base key:
//!
//! ```text
//! slot 0      +--------------------+---------------------------+
//!             | Length (u32 BE)    | Payload (up to 28 bytes)  |
//!             +--------------------+---------------------------+
//! slot N >= 1 +------------------------------------------------+
//!             | Payload (up to 32 bytes)                       |
//!             +------------------------------------------------+
//! ```
//!
//! Slot N's key is `base + N` under big-endian addition over the key bytes.
//! Writes replace the header unconditionally; slots beyond the new length
//! are left in place but can never be observed, because every read is
//! governed by the decoded length. Capacity is 256 slots, so the largest
//! storable payload is 256 * 32 - 4 bytes.

use crate::codec::StorageKey;

use super::errors::{StoreError, StoreResult};
use super::substrate::StorageSubstrate;

/// Width of one storage slot in bytes.
pub const SLOT_LEN: usize = 32;

/// Width of the length header in slot 0.
pub const HEADER_LEN: usize = 4;

/// Payload bytes carried by slot 0 after the header.
pub const HEAD_SLOT_PAYLOAD: usize = SLOT_LEN - HEADER_LEN;

/// Maximum number of slots one payload may occupy.
pub const MAX_SLOTS: usize = 256;

/// Maximum storable payload length in bytes.
pub const MAX_PAYLOAD: usize = MAX_SLOTS * SLOT_LEN - HEADER_LEN;

/// Number of slots a payload of `len` bytes occupies.
fn slot_count(len: usize) -> usize {
    if len <= HEAD_SLOT_PAYLOAD {
        1
    } else {
        1 + (len - HEAD_SLOT_PAYLOAD).div_ceil(SLOT_LEN)
    }
}

/// Store `data` under `base`, replacing any payload stored there before.
///
/// All slot keys are derived before the first write, so a failure leaves
/// the substrate untouched.
pub fn store(
    substrate: &mut dyn StorageSubstrate,
    base: StorageKey,
    data: &[u8],
) -> StoreResult<()> {
    if data.len() > MAX_PAYLOAD {
        return Err(StoreError::CapacityExceeded {
            len: data.len(),
            max: MAX_PAYLOAD,
        });
    }

    let slots = slot_count(data.len());
    let mut keys = Vec::with_capacity(slots);
    keys.push(base);
    for n in 1..slots {
        keys.push(base.offset(n as u32).ok_or(StoreError::KeyOverflow)?);
    }

    let head_take = data.len().min(HEAD_SLOT_PAYLOAD);
    let mut head = Vec::with_capacity(HEADER_LEN + head_take);
    head.extend_from_slice(&(data.len() as u32).to_be_bytes());
    head.extend_from_slice(&data[..head_take]);
    substrate.put(keys[0], head);

    if data.len() > HEAD_SLOT_PAYLOAD {
        for (i, chunk) in data[HEAD_SLOT_PAYLOAD..].chunks(SLOT_LEN).enumerate() {
            substrate.put(keys[i + 1], chunk.to_vec());
        }
    }

    Ok(())
}

/// Load the payload stored under `base`.
///
/// An absent header slot or a zero length header both read as the empty
/// payload; the two are indistinguishable by design.
pub fn load(substrate: &dyn StorageSubstrate, base: StorageKey) -> StoreResult<Vec<u8>> {
    let head = match substrate.get(&base) {
        Some(head) => head,
        None => return Ok(Vec::new()),
    };

    if head.len() < HEADER_LEN {
        return Err(StoreError::corruption("header slot shorter than length prefix"));
    }
    let len = u32::from_be_bytes([head[0], head[1], head[2], head[3]]) as usize;
    if len == 0 {
        return Ok(Vec::new());
    }
    if len > MAX_PAYLOAD {
        return Err(StoreError::corruption(format!(
            "declared length {} exceeds the {}-byte capacity",
            len, MAX_PAYLOAD
        )));
    }

    let head_take = len.min(HEAD_SLOT_PAYLOAD);
    if head.len() < HEADER_LEN + head_take {
        return Err(StoreError::corruption("header slot shorter than declared length"));
    }

    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(&head[HEADER_LEN..HEADER_LEN + head_take]);

    let mut remaining = len - head_take;
    let mut slot: u32 = 1;
    while remaining > 0 {
        let key = base.offset(slot).ok_or(StoreError::KeyOverflow)?;
        let value = substrate
            .get(&key)
            .ok_or_else(|| StoreError::corruption(format!("slot {} missing", slot)))?;
        let take = remaining.min(SLOT_LEN);
        if value.len() < take {
            return Err(StoreError::corruption(format!(
                "slot {} holds {} bytes, {} required",
                slot,
                value.len(),
                take
            )));
        }
        out.extend_from_slice(&value[..take]);
        remaining -= take;
        slot += 1;
    }

    Ok(out)
}
