use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use pharmanet_core::KeyModification;

use super::r#trait::{CommitReceipt, PendingTransaction, VersionedValue, WorldState, WorldStateError};

#[derive(Debug, Default)]
struct Ledger {
    state: BTreeMap<String, VersionedValue>,
    history: HashMap<String, Vec<KeyModification>>,
    height: u64,
}

impl Ledger {
    fn scan(&self, prefix: &str) -> impl Iterator<Item = (&String, &VersionedValue)> {
        self.state
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
    }
}

/// In-memory world state.
///
/// Intended for tests/dev. Commits are serialized by a single write lock.
#[derive(Debug, Default)]
pub struct InMemoryWorldState {
    ledger: RwLock<Ledger>,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> WorldStateError {
    WorldStateError::Unavailable("lock poisoned".to_string())
}

impl WorldState for InMemoryWorldState {
    fn get_state(&self, key: &str) -> Result<Option<VersionedValue>, WorldStateError> {
        let ledger = self.ledger.read().map_err(poisoned)?;
        Ok(ledger.state.get(key).cloned())
    }

    fn get_state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, VersionedValue)>, WorldStateError> {
        let ledger = self.ledger.read().map_err(poisoned)?;
        Ok(ledger.scan(prefix).map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn get_history_for_key(&self, key: &str) -> Result<Vec<KeyModification>, WorldStateError> {
        let ledger = self.ledger.read().map_err(poisoned)?;
        Ok(ledger.history.get(key).cloned().unwrap_or_default())
    }

    fn commit(&self, tx: PendingTransaction) -> Result<CommitReceipt, WorldStateError> {
        let mut ledger = self.ledger.write().map_err(poisoned)?;

        // 1) Validate point reads.
        for (key, read) in &tx.rwset.reads {
            let current = ledger.state.get(key).map(|v| v.version);
            if current != *read {
                return Err(WorldStateError::MvccConflict {
                    key: key.clone(),
                    read: *read,
                    current,
                });
            }
        }

        // 2) Validate range reads: same keys, same versions.
        for range in &tx.rwset.ranges {
            let now = ledger.scan(&range.prefix).map(|(k, v)| (k.as_str(), v.version));
            if !now.eq(range.results.iter().map(|(k, v)| (k.as_str(), *v))) {
                return Err(WorldStateError::PhantomConflict(range.prefix.clone()));
            }
        }

        // 3) Apply writes and record history.
        let keys_written = tx.rwset.writes.len();
        for (key, value) in tx.rwset.writes {
            let version = ledger.state.get(&key).map_or(1, |v| v.version + 1);
            ledger.history.entry(key.clone()).or_default().push(KeyModification {
                tx_id: tx.tx_id,
                timestamp: tx.timestamp,
                value: value.clone(),
            });
            ledger.state.insert(key, VersionedValue { value, version });
        }
        ledger.height += 1;

        Ok(CommitReceipt {
            tx_id: tx.tx_id,
            block_number: ledger.height,
            keys_written,
        })
    }

    fn height(&self) -> Result<u64, WorldStateError> {
        Ok(self.ledger.read().map_err(poisoned)?.height)
    }
}
