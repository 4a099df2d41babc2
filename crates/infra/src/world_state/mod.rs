//! World state boundary.
//!
//! The current value of every ledger key, plus the history of how it got
//! there. Chaincode never talks to this directly; it goes through a
//! [`crate::simulation::TransactionSimulator`].

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryWorldState;
pub use r#trait::{
    CommitReceipt, PendingTransaction, RangeRead, ReadWriteSet, VersionedValue, WorldState, WorldStateError,
};
