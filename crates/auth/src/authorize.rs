use thiserror::Error;

use pharmanet_core::DomainError;

use crate::{ClientIdentity, Organisation};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("client MSP '{0}' is not a member of the network")]
    UnknownMsp(String),

    #[error("You are not authorized to perform {operation} : Your Organization is : {msp_id}")]
    Forbidden { operation: String, msp_id: String },
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        DomainError::unauthorized(value.to_string())
    }
}

/// Authorize the submitting client for `operation`.
///
/// The decision is made on the client's MSP alone; the platform has already
/// verified that the client belongs to that MSP.
pub fn authorize(client: &ClientIdentity, operation: &str, allowed: &[Organisation]) -> Result<Organisation, AuthzError> {
    let org = client
        .organisation()
        .ok_or_else(|| AuthzError::UnknownMsp(client.msp_id().to_string()))?;

    if allowed.contains(&org) {
        Ok(org)
    } else {
        Err(AuthzError::Forbidden {
            operation: operation.to_string(),
            msp_id: client.msp_id().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(msp: &str) -> ClientIdentity {
        ClientIdentity::new(msp, format!("x509::CN=test::{msp}"))
    }

    #[test]
    fn allows_listed_organisations() {
        let org = authorize(&client("retailerMSP"), "createPO", &[Organisation::Distributor, Organisation::Retailer]).unwrap();
        assert_eq!(org, Organisation::Retailer);
    }

    #[test]
    fn rejects_other_organisations() {
        let err = authorize(&client("manufacturerMSP"), "createPO", &[Organisation::Distributor]).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                operation: "createPO".into(),
                msp_id: "manufacturerMSP".into()
            }
        );
        assert!(matches!(DomainError::from(err), DomainError::Unauthorized(_)));
    }

    #[test]
    fn rejects_unknown_msp() {
        let err = authorize(&client("OrdererMSP"), "addDrug", &Organisation::ALL).unwrap_err();
        assert_eq!(err, AuthzError::UnknownMsp("OrdererMSP".into()));
    }
}
