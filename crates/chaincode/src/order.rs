//! Purchase orders between adjacent levels of the supply chain.

use serde::{Deserialize, Serialize};

use pharmanet_auth::Organisation;
use pharmanet_core::{CompanyCrn, DomainError, DomainResult, DrugName, Entity, create_composite_key};

use crate::company::{OrganisationRole, find_company};
use crate::context::TxContext;

pub const PO_OBJECT_TYPE: &str = "org.pharma-network.pharmanet.po";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PoStatus {
    Open,
    /// A shipment has been dispatched against the order.
    Fulfilled,
}

/// Ledger record: a buyer's order for a quantity of one drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    #[serde(rename = "poID")]
    pub po_id: String,
    pub drug_name: DrugName,
    pub quantity: u32,
    pub buyer: String,
    pub seller: String,
    pub status: PoStatus,
}

impl Entity for PurchaseOrder {
    const OBJECT_TYPE: &'static str = PO_OBJECT_TYPE;

    fn key(&self) -> &str {
        &self.po_id
    }
}

pub(crate) fn po_key(buyer: &CompanyCrn, drug: &DrugName) -> DomainResult<String> {
    create_composite_key(PO_OBJECT_TYPE, &[buyer.as_str(), drug.as_str()])
}

fn parse_quantity(raw: &str) -> DomainResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(quantity) if quantity > 0 => Ok(quantity),
        _ => Err(DomainError::validation(format!("quantity must be a positive integer, got '{raw}'"))),
    }
}

/// Place an order from `buyer_crn` to `seller_crn`.
///
/// Drugs flow manufacturer -> distributor -> retailer, one level per order.
/// A new order for the same buyer and drug replaces the previous one and is
/// open again for shipping.
pub fn create_po(
    ctx: &mut TxContext<'_>,
    buyer_crn: &str,
    seller_crn: &str,
    drug_name: &str,
    quantity: &str,
) -> DomainResult<PurchaseOrder> {
    ctx.require("createPO", &[Organisation::Distributor, Organisation::Retailer])?;

    let drug_name = DrugName::parse(drug_name)?;
    let quantity = parse_quantity(quantity)?;
    let buyer = find_company(ctx, buyer_crn, "BUYER")?;
    let seller = find_company(ctx, seller_crn, "SELLER")?;

    if buyer.organisation_role == OrganisationRole::Manufacturer {
        return Err(DomainError::invariant("Manufacturer cannot create a purchase order"));
    }
    let (Some(buyer_level), Some(seller_level)) = (buyer.hierarchy_key, seller.hierarchy_key) else {
        return Err(DomainError::invariant("Transporters cannot buy or sell drugs"));
    };
    if seller_level + 1 != buyer_level {
        return Err(DomainError::invariant(format!(
            "{} cannot purchase from {}: purchases must follow the supply hierarchy",
            buyer.organisation_role, seller.organisation_role
        )));
    }

    let po = PurchaseOrder {
        po_id: po_key(&buyer.crn, &drug_name)?,
        drug_name,
        quantity,
        buyer: buyer.company_id,
        seller: seller.company_id,
        status: PoStatus::Open,
    };
    ctx.write(&po)?;
    ctx.emit("createPO_Event", &po)?;

    tracing::debug!(po = %po.po_id, quantity, "purchase order created");
    Ok(po)
}
