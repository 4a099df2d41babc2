use serde::{Deserialize, Serialize};

use crate::Organisation;

/// PEM material of an X.509 identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub certificate: String,
    pub private_key: String,
}

/// Wallet entry: an X.509 identity bound to an MSP.
///
/// Serialized in the platform's wallet layout so existing wallets stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X509Identity {
    pub credentials: Credentials,
    pub msp_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
}

impl X509Identity {
    pub const KIND: &'static str = "X.509";

    pub fn new(msp_id: impl Into<String>, certificate: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                certificate: certificate.into(),
                private_key: private_key.into(),
            },
            msp_id: msp_id.into(),
            kind: Self::KIND.to_string(),
            version: 1,
        }
    }
}

/// The submitting client as seen by chaincode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    msp_id: String,
    id: String,
}

impl ClientIdentity {
    pub fn new(msp_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
            id: id.into(),
        }
    }

    /// Derive the client identity of a wallet entry stored under `label`.
    pub fn from_x509(label: &str, identity: &X509Identity) -> Self {
        Self::new(
            identity.msp_id.clone(),
            format!("x509::CN={label}::{}", identity.msp_id),
        )
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// Unique id of the client (recorded as `updatedBy` on ledger records).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn organisation(&self) -> Option<Organisation> {
        Organisation::from_msp_id(&self.msp_id)
    }
}
