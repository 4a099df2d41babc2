//! Chaincode events and their distribution after commit.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::ChaincodeEvent;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
