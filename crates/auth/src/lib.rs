//! `pharmanet-auth`: organisations, client identities and MSP-based authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod identity;
pub mod organisation;

pub use authorize::{AuthzError, authorize};
pub use identity::{ClientIdentity, Credentials, X509Identity};
pub use organisation::{Organisation, UnknownOrganisation};
