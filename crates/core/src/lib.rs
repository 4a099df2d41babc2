//! `pharmanet-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, identifier newtypes, composite ledger keys and the
//! chaincode stub contract that ledger backends implement.

pub mod composite_key;
pub mod entity;
pub mod error;
pub mod id;
pub mod stub;

pub use composite_key::{create_composite_key, split_composite_key};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CompanyCrn, DrugName, SerialNo, TxId};
pub use stub::{ChaincodeStub, KeyModification, KeyValue};
