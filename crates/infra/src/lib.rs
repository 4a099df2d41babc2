//! Infrastructure layer: world state, transaction simulation, gateway and wallet.

pub mod gateway;
pub mod simulation;
pub mod wallet;
pub mod world_state;

pub use gateway::{Contract, Gateway, GatewayError, Network};
pub use simulation::{PendingEvent, Simulation, TransactionSimulator};
pub use wallet::{CryptoMaterial, FileSystemWallet, WalletError, import_admin_identity, import_all_admin_identities};
pub use world_state::{InMemoryWorldState, WorldState, WorldStateError};
