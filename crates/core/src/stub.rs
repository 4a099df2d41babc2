//! Chaincode stub boundary.
//!
//! The stub is the only way chaincode touches the ledger. It mirrors the
//! platform's shim API so the business rules stay independent of whichever
//! backend simulates the transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::id::TxId;

/// A key and its committed value, as returned by range queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// One committed modification of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyModification {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    pub value: Vec<u8>,
}

/// Ledger access available to a running transaction.
///
/// Semantics implementations must honour:
/// - reads observe committed state only (not this transaction's own writes)
/// - writes are buffered and become visible only when the transaction commits
/// - at most one event per transaction; a later `set_event` replaces the earlier one
pub trait ChaincodeStub {
    /// Identifier of the transaction being simulated.
    fn tx_id(&self) -> TxId;

    /// Timestamp the client assigned to the transaction.
    fn tx_timestamp(&self) -> DateTime<Utc>;

    fn get_state(&mut self, key: &str) -> DomainResult<Option<Vec<u8>>>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> DomainResult<()>;

    /// All committed entries whose key starts with the composite key of
    /// `object_type` + `attributes`, in key order.
    fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[&str],
    ) -> DomainResult<Vec<KeyValue>>;

    /// Committed modifications of `key`, oldest first.
    fn get_history_for_key(&mut self, key: &str) -> DomainResult<Vec<KeyModification>>;

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> DomainResult<()>;
}
