use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use pharmanet_core::{KeyModification, TxId};

/// A committed value and the version it was committed at.
///
/// Versions are per key: the first commit of a key produces version 1 and
/// every later commit increments it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: u64,
}

/// Result of a prefix query observed during simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRead {
    pub prefix: String,
    /// Matched keys and their versions, in key order.
    pub results: Vec<(String, u64)>,
}

/// Everything a simulated transaction observed and intends to write.
///
/// ## Validation
///
/// At commit time the world state compares:
/// - every entry of `reads` against the key's current version (`None` = the key was absent)
/// - every `RangeRead` against a fresh scan of the same prefix (phantom protection)
///
/// Any mismatch means another transaction committed in between and the whole
/// set is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    pub reads: BTreeMap<String, Option<u64>>,
    pub ranges: Vec<RangeRead>,
    pub writes: BTreeMap<String, Vec<u8>>,
}

/// A transaction ready for commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    pub rwset: ReadWriteSet,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitReceipt {
    pub tx_id: TxId,
    /// Height of the ledger after this commit (one transaction per block).
    pub block_number: u64,
    pub keys_written: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldStateError {
    /// A key read during simulation changed before commit.
    #[error("MVCC read conflict on key {key:?}: read version {read:?}, current {current:?}")]
    MvccConflict {
        key: String,
        read: Option<u64>,
        current: Option<u64>,
    },

    /// A prefix query would return different results at commit time.
    #[error("phantom read conflict on prefix {0:?}")]
    PhantomConflict(String),

    #[error("world state unavailable: {0}")]
    Unavailable(String),
}

/// Versioned key-value state with per-key history.
///
/// Reads only ever see committed data. Writes only happen through
/// [`WorldState::commit`], which validates a transaction's read set and applies
/// its write set atomically.
pub trait WorldState: Send + Sync {
    fn get_state(&self, key: &str) -> Result<Option<VersionedValue>, WorldStateError>;

    /// All committed entries whose key starts with `prefix`, in key order.
    fn get_state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, VersionedValue)>, WorldStateError>;

    /// Committed modifications of `key`, oldest first.
    fn get_history_for_key(&self, key: &str) -> Result<Vec<KeyModification>, WorldStateError>;

    /// Validate and apply a transaction (all or nothing).
    fn commit(&self, tx: PendingTransaction) -> Result<CommitReceipt, WorldStateError>;

    /// Number of committed transactions.
    fn height(&self) -> Result<u64, WorldStateError>;
}

impl<S> WorldState for Arc<S>
where
    S: WorldState + ?Sized,
{
    fn get_state(&self, key: &str) -> Result<Option<VersionedValue>, WorldStateError> {
        (**self).get_state(key)
    }

    fn get_state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, VersionedValue)>, WorldStateError> {
        (**self).get_state_by_prefix(prefix)
    }

    fn get_history_for_key(&self, key: &str) -> Result<Vec<KeyModification>, WorldStateError> {
        (**self).get_history_for_key(key)
    }

    fn commit(&self, tx: PendingTransaction) -> Result<CommitReceipt, WorldStateError> {
        (**self).commit(tx)
    }

    fn height(&self) -> Result<u64, WorldStateError> {
        (**self).height()
    }
}
