use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pharmanet_core::TxId;

/// Event emitted by a committed transaction (`set_event` on the stub).
///
/// Events are facts: they are only published once the transaction that set them
/// has been committed to the world state. Publication order across concurrent
/// commits is not guaranteed; `block_number` gives the commit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaincodeEvent {
    tx_id: TxId,
    block_number: u64,
    chaincode: String,
    event_name: String,
    committed_at: DateTime<Utc>,
    payload: Vec<u8>,
}

impl ChaincodeEvent {
    pub fn new(
        tx_id: TxId,
        block_number: u64,
        chaincode: impl Into<String>,
        event_name: impl Into<String>,
        committed_at: DateTime<Utc>,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            tx_id,
            block_number,
            chaincode: chaincode.into(),
            event_name: event_name.into(),
            committed_at,
            payload,
        }
    }

    pub fn tx_id(&self) -> TxId {
        self.tx_id
    }

    /// Ledger height after the transaction committed.
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    pub fn chaincode(&self) -> &str {
        &self.chaincode
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload decoded as JSON, falling back to a string for non-JSON payloads.
    pub fn payload_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.payload)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&self.payload).into_owned()))
    }
}
