//! Company registration and CRN lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pharmanet_auth::Organisation;
use pharmanet_core::{CompanyCrn, DomainError, DomainResult, Entity, create_composite_key};

use crate::context::TxContext;

pub const COMPANY_OBJECT_TYPE: &str = "org.pharma-network.pharmanet.company";

/// Role a company plays in the supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrganisationRole {
    Manufacturer,
    Distributor,
    Retailer,
    Transporter,
}

impl OrganisationRole {
    /// Position in the purchase hierarchy. Drugs only move one level down at a
    /// time; transporters carry goods but never buy or sell.
    pub fn hierarchy_key(self) -> Option<u8> {
        match self {
            OrganisationRole::Manufacturer => Some(1),
            OrganisationRole::Distributor => Some(2),
            OrganisationRole::Retailer => Some(3),
            OrganisationRole::Transporter => None,
        }
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "manufacturer" => Ok(OrganisationRole::Manufacturer),
            "distributor" => Ok(OrganisationRole::Distributor),
            "retailer" => Ok(OrganisationRole::Retailer),
            "transporter" => Ok(OrganisationRole::Transporter),
            _ => Err(DomainError::validation(format!("Invalid Organisation Role : {raw}"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrganisationRole::Manufacturer => "MANUFACTURER",
            OrganisationRole::Distributor => "DISTRIBUTOR",
            OrganisationRole::Retailer => "RETAILER",
            OrganisationRole::Transporter => "TRANSPORTER",
        }
    }
}

impl core::fmt::Display for OrganisationRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger record: a registered company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "companyID")]
    pub company_id: String,
    pub crn: CompanyCrn,
    pub name: String,
    pub location: String,
    pub organisation_role: OrganisationRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_key: Option<u8>,
    pub updated_by: String,
    pub updated_on: DateTime<Utc>,
}

impl Entity for Company {
    const OBJECT_TYPE: &'static str = COMPANY_OBJECT_TYPE;

    fn key(&self) -> &str {
        &self.company_id
    }
}

/// Register a new company on the network.
///
/// Any member except consumers may register. CRNs are unique network-wide.
pub fn register_company(
    ctx: &mut TxContext<'_>,
    company_crn: &str,
    company_name: &str,
    location: &str,
    organisation_role: &str,
) -> DomainResult<Company> {
    ctx.require(
        "registerCompany",
        &[
            Organisation::Manufacturer,
            Organisation::Distributor,
            Organisation::Retailer,
            Organisation::Transporter,
        ],
    )?;

    let role = OrganisationRole::parse(organisation_role)?;
    let crn = CompanyCrn::parse(company_crn)?;
    let name = company_name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("companyName must not be empty"));
    }

    if !search_company_by_crn(ctx, &crn)?.is_empty() {
        return Err(DomainError::conflict(format!(
            "Invalid COMPANY Details. Another company with CRN {crn} already exists."
        )));
    }

    let company = Company {
        company_id: create_composite_key(COMPANY_OBJECT_TYPE, &[crn.as_str(), name])?,
        crn,
        name: name.to_string(),
        location: location.trim().to_string(),
        organisation_role: role,
        hierarchy_key: role.hierarchy_key(),
        updated_by: ctx.client.id().to_string(),
        updated_on: ctx.stub.tx_timestamp(),
    };
    ctx.write(&company)?;

    tracing::debug!(crn = %company.crn, role = %role, "company registered");
    Ok(company)
}

/// All companies registered under `crn` (at most one once registration is enforced).
pub fn search_company_by_crn(ctx: &mut TxContext<'_>, crn: &CompanyCrn) -> DomainResult<Vec<Company>> {
    ctx.search(COMPANY_OBJECT_TYPE, &[crn.as_str()])
}

/// Resolve a CRN argument to its company. `party` names the argument in errors
/// (e.g. `BUYER`).
pub(crate) fn find_company(ctx: &mut TxContext<'_>, raw_crn: &str, party: &str) -> DomainResult<Company> {
    let crn = CompanyCrn::parse(raw_crn)?;
    search_company_by_crn(ctx, &crn)?
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::not_found(format!("Invalid {party} CRN : {crn}")))
}

pub fn view_company(ctx: &mut TxContext<'_>, company_crn: &str) -> DomainResult<Company> {
    find_company(ctx, company_crn, "COMPANY")
}
