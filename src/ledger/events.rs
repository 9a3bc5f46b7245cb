//! Switch lifecycle events
//!
//! Per CONTRACT.md §3, the state machine emits typed events at each
//! lifecycle transition. The set is closed; the host observes events, it
//! never interprets storage.
//!
//! The canonical binary encoding of an event is the concatenation of its
//! fields in declaration order, each in its fixed-width 32-byte form
//! (big-endian for integers, raw bytes for accounts).

use serde_json::{json, Value};

use crate::codec::{word, AccountId};

/// Events emitted by the switch state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    SwitchCreated {
        switch_id: u64,
        owner: AccountId,
        beneficiary: AccountId,
    },
    CheckedIn {
        switch_id: u64,
        block_height: u64,
    },
    DataStored {
        switch_id: u64,
        chunk_index: u32,
    },
    SwitchTriggered {
        switch_id: u64,
        beneficiary: AccountId,
        block_height: u64,
    },
    SwitchCancelled {
        switch_id: u64,
        block_height: u64,
    },
    BeneficiaryUpdated {
        switch_id: u64,
        new_beneficiary: AccountId,
    },
}

impl LedgerEvent {
    /// Uppercase event name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SwitchCreated { .. } => "SWITCH_CREATED",
            Self::CheckedIn { .. } => "CHECKED_IN",
            Self::DataStored { .. } => "DATA_STORED",
            Self::SwitchTriggered { .. } => "SWITCH_TRIGGERED",
            Self::SwitchCancelled { .. } => "SWITCH_CANCELLED",
            Self::BeneficiaryUpdated { .. } => "BENEFICIARY_UPDATED",
        }
    }

    /// Canonical binary encoding: fields concatenated in declaration
    /// order, 32 bytes each.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self {
            Self::SwitchCreated {
                switch_id,
                owner,
                beneficiary,
            } => {
                out.extend_from_slice(&word::encode_u64(*switch_id));
                out.extend_from_slice(owner.as_bytes());
                out.extend_from_slice(beneficiary.as_bytes());
            }
            Self::CheckedIn {
                switch_id,
                block_height,
            } => {
                out.extend_from_slice(&word::encode_u64(*switch_id));
                out.extend_from_slice(&word::encode_u64(*block_height));
            }
            Self::DataStored {
                switch_id,
                chunk_index,
            } => {
                out.extend_from_slice(&word::encode_u64(*switch_id));
                out.extend_from_slice(&word::encode_u64(u64::from(*chunk_index)));
            }
            Self::SwitchTriggered {
                switch_id,
                beneficiary,
                block_height,
            } => {
                out.extend_from_slice(&word::encode_u64(*switch_id));
                out.extend_from_slice(beneficiary.as_bytes());
                out.extend_from_slice(&word::encode_u64(*block_height));
            }
            Self::SwitchCancelled {
                switch_id,
                block_height,
            } => {
                out.extend_from_slice(&word::encode_u64(*switch_id));
                out.extend_from_slice(&word::encode_u64(*block_height));
            }
            Self::BeneficiaryUpdated {
                switch_id,
                new_beneficiary,
            } => {
                out.extend_from_slice(&word::encode_u64(*switch_id));
                out.extend_from_slice(new_beneficiary.as_bytes());
            }
        }
        out
    }

    /// JSON rendering for the host protocol.
    pub fn to_json(&self) -> Value {
        match self {
            Self::SwitchCreated {
                switch_id,
                owner,
                beneficiary,
            } => json!({
                "event": self.kind(),
                "switch_id": switch_id,
                "owner": owner.to_hex(),
                "beneficiary": beneficiary.to_hex(),
            }),
            Self::CheckedIn {
                switch_id,
                block_height,
            } => json!({
                "event": self.kind(),
                "switch_id": switch_id,
                "block_height": block_height,
            }),
            Self::DataStored {
                switch_id,
                chunk_index,
            } => json!({
                "event": self.kind(),
                "switch_id": switch_id,
                "chunk_index": chunk_index,
            }),
            Self::SwitchTriggered {
                switch_id,
                beneficiary,
                block_height,
            } => json!({
                "event": self.kind(),
                "switch_id": switch_id,
                "beneficiary": beneficiary.to_hex(),
                "block_height": block_height,
            }),
            Self::SwitchCancelled {
                switch_id,
                block_height,
            } => json!({
                "event": self.kind(),
                "switch_id": switch_id,
                "block_height": block_height,
            }),
            Self::BeneficiaryUpdated {
                switch_id,
                new_beneficiary,
            } => json!({
                "event": self.kind(),
                "switch_id": switch_id,
                "new_beneficiary": new_beneficiary.to_hex(),
            }),
        }
    }

    /// String fields for the structured logger.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::SwitchCreated {
                switch_id,
                owner,
                beneficiary,
            } => vec![
                ("switch_id", switch_id.to_string()),
                ("owner", owner.to_hex()),
                ("beneficiary", beneficiary.to_hex()),
            ],
            Self::CheckedIn {
                switch_id,
                block_height,
            }
            | Self::SwitchCancelled {
                switch_id,
                block_height,
            } => vec![
                ("switch_id", switch_id.to_string()),
                ("block_height", block_height.to_string()),
            ],
            Self::DataStored {
                switch_id,
                chunk_index,
            } => vec![
                ("switch_id", switch_id.to_string()),
                ("chunk_index", chunk_index.to_string()),
            ],
            Self::SwitchTriggered {
                switch_id,
                beneficiary,
                block_height,
            } => vec![
                ("switch_id", switch_id.to_string()),
                ("beneficiary", beneficiary.to_hex()),
                ("block_height", block_height.to_string()),
            ],
            Self::BeneficiaryUpdated {
                switch_id,
                new_beneficiary,
            } => vec![
                ("switch_id", switch_id.to_string()),
                ("new_beneficiary", new_beneficiary.to_hex()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_encoding_is_bit_exact() {
        let owner = AccountId::from_name("owner");
        let beneficiary = AccountId::from_name("heir");
        let event = LedgerEvent::SwitchCreated {
            switch_id: 7,
            owner,
            beneficiary,
        };
        let bytes = event.encode();
        assert_eq!(bytes.len(), 96);
        assert_eq!(&bytes[..32], &word::encode_u64(7));
        assert_eq!(&bytes[32..64], owner.as_bytes());
        assert_eq!(&bytes[64..96], beneficiary.as_bytes());
    }

    #[test]
    fn test_two_field_events_encode_64_bytes() {
        let event = LedgerEvent::CheckedIn {
            switch_id: 1,
            block_height: 500,
        };
        let bytes = event.encode();
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[32..], &word::encode_u64(500));
    }

    #[test]
    fn test_chunk_index_widens_to_canonical_word() {
        let event = LedgerEvent::DataStored {
            switch_id: 1,
            chunk_index: 3,
        };
        assert_eq!(&event.encode()[32..], &word::encode_u64(3));
    }

    #[test]
    fn test_kinds_are_uppercase() {
        let event = LedgerEvent::SwitchTriggered {
            switch_id: 1,
            beneficiary: AccountId::ZERO,
            block_height: 2,
        };
        assert!(event.kind().chars().all(|c| c.is_ascii_uppercase() || c == '_'));
    }

    #[test]
    fn test_json_rendering_names_fields() {
        let event = LedgerEvent::DataStored {
            switch_id: 4,
            chunk_index: 2,
        };
        let value = event.to_json();
        assert_eq!(value["event"], "DATA_STORED");
        assert_eq!(value["switch_id"], 4);
        assert_eq!(value["chunk_index"], 2);
    }
}
