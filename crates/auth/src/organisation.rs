use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Member organisation of the network.
///
/// Each organisation is identified on the ledger by its MSP id and acts
/// through a single admin identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organisation {
    Manufacturer,
    Distributor,
    Retailer,
    Transporter,
    Consumer,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown organisation '{0}'")]
pub struct UnknownOrganisation(pub String);

impl Organisation {
    pub const ALL: [Organisation; 5] = [
        Organisation::Manufacturer,
        Organisation::Distributor,
        Organisation::Retailer,
        Organisation::Transporter,
        Organisation::Consumer,
    ];

    /// Lower-case organisation type, as used in request bodies and paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Organisation::Manufacturer => "manufacturer",
            Organisation::Distributor => "distributor",
            Organisation::Retailer => "retailer",
            Organisation::Transporter => "transporter",
            Organisation::Consumer => "consumer",
        }
    }

    pub fn msp_id(self) -> &'static str {
        match self {
            Organisation::Manufacturer => "manufacturerMSP",
            Organisation::Distributor => "distributorMSP",
            Organisation::Retailer => "retailerMSP",
            Organisation::Transporter => "transporterMSP",
            Organisation::Consumer => "consumerMSP",
        }
    }

    pub fn from_msp_id(msp_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|org| org.msp_id() == msp_id)
    }

    /// Wallet label of the organisation's admin identity (e.g. `RETAILER_ADMIN`).
    pub fn admin_label(self) -> String {
        format!("{}_ADMIN", self.as_str().to_uppercase())
    }

    /// Network domain of the organisation's peers and users.
    pub fn domain(self) -> String {
        format!("{}.pharma-network.com", self.as_str())
    }
}

impl core::fmt::Display for Organisation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Organisation {
    type Err = UnknownOrganisation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|org| org.as_str() == normalised)
            .ok_or_else(|| UnknownOrganisation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_org_types_case_insensitively() {
        assert_eq!("Retailer".parse::<Organisation>().unwrap(), Organisation::Retailer);
        assert_eq!(" transporter ".parse::<Organisation>().unwrap(), Organisation::Transporter);
        assert!("regulator".parse::<Organisation>().is_err());
    }

    #[test]
    fn msp_ids_round_trip() {
        for org in Organisation::ALL {
            assert_eq!(Organisation::from_msp_id(org.msp_id()), Some(org));
        }
        assert_eq!(Organisation::from_msp_id("OrdererMSP"), None);
    }

    #[test]
    fn admin_label_and_domain() {
        assert_eq!(Organisation::Distributor.admin_label(), "DISTRIBUTOR_ADMIN");
        assert_eq!(Organisation::Consumer.domain(), "consumer.pharma-network.com");
    }
}
