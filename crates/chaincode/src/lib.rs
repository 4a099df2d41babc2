//! PharmaNet chaincode: supply-chain state transitions over the ledger stub.
//!
//! Business rules only. Every function reads and writes through
//! [`pharmanet_core::ChaincodeStub`]; how a transaction is simulated, committed
//! or rejected is the caller's concern.

pub mod company;
pub mod context;
pub mod contract;
pub mod drug;
pub mod order;
pub mod shipment;

#[cfg(test)]
pub(crate) mod testing;

pub use company::{Company, OrganisationRole};
pub use context::TxContext;
pub use contract::{ContractName, Function, invoke};
pub use drug::{Drug, DrugHistoryEntry};
pub use order::{PoStatus, PurchaseOrder};
pub use shipment::{Shipment, ShipmentStatus};

/// Name the chaincode is deployed under.
pub const CHAINCODE_NAME: &str = "pharmanet";

/// Prefix shared by contract names and composite-key object types.
pub const NAMESPACE: &str = "org.pharma-network.pharmanet";
