//! Transaction simulation: the [`ChaincodeStub`] handed to chaincode.
//!
//! A simulator runs chaincode against committed world state without changing
//! it. Reads and range scans are recorded with the versions they observed,
//! writes are buffered, and the last event set is held back. The caller
//! decides afterwards whether to commit the resulting read-write set.

use chrono::{DateTime, Utc};

use pharmanet_core::{
    ChaincodeStub, DomainError, DomainResult, KeyModification, KeyValue, TxId, create_composite_key,
};

use crate::world_state::{PendingTransaction, RangeRead, ReadWriteSet, WorldState, WorldStateError};

impl From<WorldStateError> for DomainError {
    fn from(value: WorldStateError) -> Self {
        DomainError::ledger(value.to_string())
    }
}

/// Event set by a simulated transaction, not yet published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvent {
    pub name: String,
    pub payload: Vec<u8>,
}

/// What a finished simulation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    pub transaction: PendingTransaction,
    pub event: Option<PendingEvent>,
}

pub struct TransactionSimulator<'a, W: ?Sized> {
    world: &'a W,
    tx_id: TxId,
    timestamp: DateTime<Utc>,
    rwset: ReadWriteSet,
    event: Option<PendingEvent>,
}

impl<'a, W> TransactionSimulator<'a, W>
where
    W: WorldState + ?Sized,
{
    pub fn new(world: &'a W) -> Self {
        Self::with_id(world, TxId::new(), Utc::now())
    }

    pub fn with_id(world: &'a W, tx_id: TxId, timestamp: DateTime<Utc>) -> Self {
        Self {
            world,
            tx_id,
            timestamp,
            rwset: ReadWriteSet::default(),
            event: None,
        }
    }

    pub fn finish(self) -> Simulation {
        Simulation {
            transaction: PendingTransaction {
                tx_id: self.tx_id,
                timestamp: self.timestamp,
                rwset: self.rwset,
            },
            event: self.event,
        }
    }
}

impl<W> ChaincodeStub for TransactionSimulator<'_, W>
where
    W: WorldState + ?Sized,
{
    fn tx_id(&self) -> TxId {
        self.tx_id
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn get_state(&mut self, key: &str) -> DomainResult<Option<Vec<u8>>> {
        let current = self.world.get_state(key)?;
        // The first observed version is the one validated at commit.
        self.rwset
            .reads
            .entry(key.to_string())
            .or_insert(current.as_ref().map(|v| v.version));
        Ok(current.map(|v| v.value))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> DomainResult<()> {
        if key.is_empty() {
            return Err(DomainError::validation("key must not be empty"));
        }
        self.rwset.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[&str],
    ) -> DomainResult<Vec<KeyValue>> {
        let prefix = create_composite_key(object_type, attributes)?;
        let entries = self.world.get_state_by_prefix(&prefix)?;

        self.rwset.ranges.push(RangeRead {
            prefix,
            results: entries.iter().map(|(k, v)| (k.clone(), v.version)).collect(),
        });

        Ok(entries
            .into_iter()
            .map(|(key, v)| KeyValue { key, value: v.value })
            .collect())
    }

    fn get_history_for_key(&mut self, key: &str) -> DomainResult<Vec<KeyModification>> {
        Ok(self.world.get_history_for_key(key)?)
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> DomainResult<()> {
        if name.is_empty() {
            return Err(DomainError::validation("event name must not be empty"));
        }
        if let Some(previous) = &self.event {
            tracing::debug!(replaced = %previous.name, by = name, "chaincode event replaced");
        }
        self.event = Some(PendingEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}
