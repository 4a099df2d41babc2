//! Shipments: moving ordered drug units from seller to buyer via a transporter.

use serde::{Deserialize, Serialize};

use pharmanet_auth::Organisation;
use pharmanet_core::{CompanyCrn, DomainError, DomainResult, DrugName, Entity, SerialNo, create_composite_key};

use crate::company::{OrganisationRole, find_company};
use crate::context::TxContext;
use crate::drug::{drug_key, load_drug};
use crate::order::{PoStatus, PurchaseOrder, po_key};

pub const SHIPMENT_OBJECT_TYPE: &str = "org.pharma-network.pharmanet.shipment";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ShipmentStatus {
    InTransit,
    Delivered,
}

/// Ledger record: a consignment of drug units fulfilling one purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    #[serde(rename = "shipmentID")]
    pub shipment_id: String,
    /// Company key of the seller that dispatched the consignment.
    pub creator: String,
    /// Drug keys in the consignment.
    pub assets: Vec<String>,
    pub transporter: String,
    pub status: ShipmentStatus,
}

impl Entity for Shipment {
    const OBJECT_TYPE: &'static str = SHIPMENT_OBJECT_TYPE;

    fn key(&self) -> &str {
        &self.shipment_id
    }
}

fn shipment_key(buyer: &CompanyCrn, drug: &DrugName) -> DomainResult<String> {
    create_composite_key(SHIPMENT_OBJECT_TYPE, &[buyer.as_str(), drug.as_str()])
}

/// Parse `listOfAssets`: either a JSON array of serial numbers or a comma
/// separated list. Duplicates are dropped, first occurrence wins.
pub fn parse_asset_list(raw: &str) -> DomainResult<Vec<SerialNo>> {
    let trimmed = raw.trim();
    let entries: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)
            .map_err(|e| DomainError::validation(format!("listOfAssets is not a JSON array of strings: {e}")))?
    } else {
        trimmed.split(',').map(str::to_string).collect()
    };

    let mut serials: Vec<SerialNo> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let serial = SerialNo::parse(entry)?;
        if !serials.contains(&serial) {
            serials.push(serial);
        }
    }
    if serials.is_empty() {
        return Err(DomainError::validation("listOfAssets must name at least one drug"));
    }
    Ok(serials)
}

/// Dispatch the units of an open purchase order to a transporter.
pub fn create_shipment(
    ctx: &mut TxContext<'_>,
    buyer_crn: &str,
    drug_name: &str,
    list_of_assets: &str,
    transporter_crn: &str,
) -> DomainResult<Shipment> {
    ctx.require(
        "createShipment",
        &[Organisation::Manufacturer, Organisation::Distributor, Organisation::Retailer],
    )?;

    let drug_name = DrugName::parse(drug_name)?;
    let serials = parse_asset_list(list_of_assets)?;

    let buyer = find_company(ctx, buyer_crn, "BUYER")?;
    if buyer.organisation_role == OrganisationRole::Manufacturer {
        return Err(DomainError::invariant("Manufacturer cannot receive a shipment"));
    }

    let mut po: PurchaseOrder = ctx
        .read(&po_key(&buyer.crn, &drug_name)?)?
        .ok_or_else(|| DomainError::not_found(format!("No purchase order for {drug_name} by {}", buyer.crn)))?;
    if po.status == PoStatus::Fulfilled {
        return Err(DomainError::conflict(format!(
            "The purchase order for {drug_name} by {} has already been shipped",
            buyer.crn
        )));
    }
    if serials.len() != po.quantity as usize {
        return Err(DomainError::invariant(format!(
            "Shipment carries {} units but the purchase order is for {}",
            serials.len(),
            po.quantity
        )));
    }

    let transporter = find_company(ctx, transporter_crn, "TRANSPORTER")?;
    if transporter.organisation_role != OrganisationRole::Transporter {
        return Err(DomainError::invariant(format!(
            "company {} is a {}, not a TRANSPORTER",
            transporter.crn, transporter.organisation_role
        )));
    }

    let shipment_id = shipment_key(&buyer.crn, &drug_name)?;
    if let Some(existing) = ctx.read::<Shipment>(&shipment_id)? {
        if existing.status == ShipmentStatus::InTransit {
            return Err(DomainError::conflict(format!(
                "A shipment of {drug_name} to {} is already in transit",
                buyer.crn
            )));
        }
    }

    let mut drugs = Vec::with_capacity(serials.len());
    for serial in &serials {
        let key = drug_key(&drug_name, serial)?;
        let drug = load_drug(ctx, &key)?
            .ok_or_else(|| DomainError::not_found(format!("Drug {drug_name} with serial no {serial}")))?;
        if drug.owner != po.seller {
            return Err(DomainError::invariant(format!(
                "Drug {drug_name} ({serial}) is not owned by the seller"
            )));
        }
        drugs.push(drug);
    }

    for mut drug in drugs {
        drug.owner = transporter.company_id.clone();
        ctx.write(&drug)?;
    }

    po.status = PoStatus::Fulfilled;
    ctx.write(&po)?;

    let shipment = Shipment {
        shipment_id,
        creator: po.seller,
        assets: serials
            .iter()
            .map(|serial| drug_key(&drug_name, serial))
            .collect::<DomainResult<_>>()?,
        transporter: transporter.company_id,
        status: ShipmentStatus::InTransit,
    };
    ctx.write(&shipment)?;
    ctx.emit("createShipment_Event", &shipment)?;
    Ok(shipment)
}

/// Mark a shipment delivered and hand its units to the buyer.
pub fn update_shipment(
    ctx: &mut TxContext<'_>,
    buyer_crn: &str,
    drug_name: &str,
    transporter_crn: &str,
) -> DomainResult<Shipment> {
    ctx.require("updateShipment", &[Organisation::Transporter])?;

    let drug_name = DrugName::parse(drug_name)?;
    let buyer = find_company(ctx, buyer_crn, "BUYER")?;
    let transporter = find_company(ctx, transporter_crn, "TRANSPORTER")?;

    let mut shipment: Shipment = ctx
        .read(&shipment_key(&buyer.crn, &drug_name)?)?
        .ok_or_else(|| DomainError::not_found(format!("No shipment of {drug_name} for {}", buyer.crn)))?;
    if shipment.transporter != transporter.company_id {
        return Err(DomainError::invariant(format!(
            "Shipment is not carried by transporter {}",
            transporter.crn
        )));
    }
    if shipment.status != ShipmentStatus::InTransit {
        return Err(DomainError::invariant("Shipment has already been delivered"));
    }

    for key in &shipment.assets {
        let mut drug = load_drug(ctx, key)?.ok_or_else(|| DomainError::not_found(format!("Drug {key}")))?;
        drug.owner = buyer.company_id.clone();
        drug.shipment.push(shipment.shipment_id.clone());
        ctx.write(&drug)?;
    }

    shipment.status = ShipmentStatus::Delivered;
    ctx.write(&shipment)?;
    ctx.emit("updateShipment_Event", &shipment)?;

    tracing::debug!(shipment = %shipment.shipment_id, units = shipment.assets.len(), "shipment delivered");
    Ok(shipment)
}

pub fn view_shipment(ctx: &mut TxContext<'_>, buyer_crn: &str, drug_name: &str) -> DomainResult<Shipment> {
    let buyer = CompanyCrn::parse(buyer_crn)?;
    let drug_name = DrugName::parse(drug_name)?;
    ctx.read(&shipment_key(&buyer, &drug_name)?)?
        .ok_or_else(|| DomainError::not_found(format!("No shipment of {drug_name} for {buyer}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drug::{Drug, retail_drug, view_drug_current_state};
    use crate::order::create_po;
    use crate::testing::MockLedger;
    use proptest::prelude::*;

    const DRUG: &str = "Paracetamol";

    /// Manufacturer holds SN-1..SN-3; distributor ordered `qty`.
    fn ordered(qty: &str) -> MockLedger {
        let mut ledger = MockLedger::with_companies();
        ledger.add_drugs(DRUG, &["SN-1", "SN-2", "SN-3"]);
        ledger
            .submit(Organisation::Distributor, |ctx| create_po(ctx, "DIST001", "MAN001", DRUG, qty))
            .unwrap();
        ledger
    }

    fn ship(ledger: &mut MockLedger, assets: &str, transporter: &str) -> DomainResult<Shipment> {
        ledger.submit(Organisation::Manufacturer, |ctx| {
            create_shipment(ctx, "DIST001", DRUG, assets, transporter)
        })
    }

    fn deliver(ledger: &mut MockLedger, transporter: &str) -> DomainResult<Shipment> {
        ledger.submit(Organisation::Transporter, |ctx| update_shipment(ctx, "DIST001", DRUG, transporter))
    }

    fn current(ledger: &mut MockLedger, serial: &str) -> Drug {
        ledger
            .submit(Organisation::Consumer, |ctx| view_drug_current_state(ctx, DRUG, serial))
            .unwrap()
    }

    #[test]
    fn parses_json_and_comma_lists() {
        let json = parse_asset_list(r#"["SN-1", "SN-2"]"#).unwrap();
        let csv = parse_asset_list(" SN-1, SN-2 ,SN-1").unwrap();
        assert_eq!(json, csv);
        assert_eq!(json.len(), 2);

        assert!(matches!(parse_asset_list("[1, 2]").unwrap_err(), DomainError::Validation(_)));
        assert!(matches!(parse_asset_list("SN-1,,SN-2").unwrap_err(), DomainError::InvalidId(_)));
        assert!(matches!(parse_asset_list("[]").unwrap_err(), DomainError::Validation(_)));
    }

    #[test]
    fn shipment_moves_units_to_transporter() {
        let mut ledger = ordered("2");
        let shipment = ship(&mut ledger, "SN-1,SN-2", "TRA001").unwrap();

        assert_eq!(shipment.status, ShipmentStatus::InTransit);
        assert_eq!(shipment.assets.len(), 2);
        assert!(shipment.creator.contains("MAN001"));
        assert_eq!(ledger.last_event().unwrap().0, "createShipment_Event");

        let drug = current(&mut ledger, "SN-1");
        assert_eq!(drug.owner, shipment.transporter);
        assert_eq!(current(&mut ledger, "SN-3").owner, drug.manufacturer);

        let json = serde_json::to_value(&shipment).unwrap();
        assert_eq!(json["status"], "IN-TRANSIT");
    }

    #[test]
    fn quantity_must_match_the_order() {
        let mut ledger = ordered("2");
        let err = ship(&mut ledger, "SN-1", "TRA001").unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        // duplicates count once
        let err = ship(&mut ledger, "SN-1,SN-1", "TRA001").unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn requires_a_purchase_order() {
        let mut ledger = MockLedger::with_companies();
        ledger.add_drugs(DRUG, &["SN-1"]);
        let err = ship(&mut ledger, "SN-1", "TRA001").unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn transporter_must_have_transporter_role() {
        let mut ledger = ordered("1");
        let err = ship(&mut ledger, "SN-1", "RET001").unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(msg) if msg.contains("TRANSPORTER")));
    }

    #[test]
    fn assets_must_belong_to_the_seller() {
        let mut ledger = ordered("1");
        let err = ship(&mut ledger, "SN-9", "TRA001").unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        ship(&mut ledger, "SN-1", "TRA001").unwrap();
        deliver(&mut ledger, "TRA001").unwrap();
        ledger
            .submit(Organisation::Distributor, |ctx| create_po(ctx, "DIST001", "MAN001", DRUG, "1"))
            .unwrap();
        // SN-1 now belongs to the distributor, not the manufacturer
        let err = ship(&mut ledger, "SN-1", "TRA001").unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(msg) if msg.contains("not owned")));
    }

    #[test]
    fn second_shipment_while_in_transit_conflicts() {
        let mut ledger = ordered("1");
        ship(&mut ledger, "SN-1", "TRA001").unwrap();
        ledger
            .submit(Organisation::Distributor, |ctx| create_po(ctx, "DIST001", "MAN001", DRUG, "1"))
            .unwrap();
        let err = ship(&mut ledger, "SN-2", "TRA001").unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("in transit")));
    }

    #[test]
    fn purchase_order_ships_only_once() {
        let mut ledger = ordered("1");
        ship(&mut ledger, "SN-1", "TRA001").unwrap();
        deliver(&mut ledger, "TRA001").unwrap();

        let key = po_key(&CompanyCrn::parse("DIST001").unwrap(), &DrugName::parse(DRUG).unwrap()).unwrap();
        assert_eq!(ledger.get::<PurchaseOrder>(&key).unwrap().status, PoStatus::Fulfilled);

        let err = ship(&mut ledger, "SN-2", "TRA001").unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg.contains("already been shipped")));
        let untouched = current(&mut ledger, "SN-2");
        assert_eq!(untouched.owner, untouched.manufacturer);

        // a fresh order can be shipped again
        ledger
            .submit(Organisation::Distributor, |ctx| create_po(ctx, "DIST001", "MAN001", DRUG, "1"))
            .unwrap();
        assert_eq!(ship(&mut ledger, "SN-2", "TRA001").unwrap().status, ShipmentStatus::InTransit);
    }

    #[test]
    fn unknown_shipment_is_not_found() {
        let mut ledger = ordered("1");
        let err = ledger
            .submit(Organisation::Consumer, |ctx| view_shipment(ctx, "DIST001", DRUG))
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("No shipment of Paracetamol for DIST001"));
    }

    #[test]
    fn delivery_hands_units_to_buyer() {
        let mut ledger = ordered("2");
        let created = ship(&mut ledger, "SN-1,SN-2", "TRA001").unwrap();
        let delivered = deliver(&mut ledger, "TRA001").unwrap();

        assert_eq!(delivered.status, ShipmentStatus::Delivered);
        assert_eq!(delivered.shipment_id, created.shipment_id);
        assert_eq!(ledger.last_event().unwrap().0, "updateShipment_Event");

        let drug = current(&mut ledger, "SN-2");
        assert!(drug.owner.contains("DIST001"));
        assert_eq!(drug.shipment, vec![created.shipment_id.clone()]);

        let err = deliver(&mut ledger, "TRA001").unwrap_err();
        assert_eq!(err, DomainError::invariant("Shipment has already been delivered"));
    }

    #[test]
    fn only_the_assigned_transporter_delivers() {
        let mut ledger = ordered("1");
        ledger
            .submit(Organisation::Transporter, |ctx| {
                crate::company::register_company(ctx, "TRA002", "Blue Dart", "Mumbai", "Transporter")
            })
            .unwrap();
        ship(&mut ledger, "SN-1", "TRA001").unwrap();

        let err = deliver(&mut ledger, "TRA002").unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let err = ledger
            .submit(Organisation::Distributor, |ctx| update_shipment(ctx, "DIST001", DRUG, "TRA001"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn full_supply_chain_to_consumer() {
        let mut ledger = ordered("1");
        ship(&mut ledger, "SN-1", "TRA001").unwrap();
        deliver(&mut ledger, "TRA001").unwrap();

        ledger
            .submit(Organisation::Retailer, |ctx| create_po(ctx, "RET001", "DIST001", DRUG, "1"))
            .unwrap();
        ledger
            .submit(Organisation::Distributor, |ctx| create_shipment(ctx, "RET001", DRUG, "[\"SN-1\"]", "TRA001"))
            .unwrap();
        ledger
            .submit(Organisation::Transporter, |ctx| update_shipment(ctx, "RET001", DRUG, "TRA001"))
            .unwrap();

        let sold = ledger
            .submit(Organisation::Retailer, |ctx| retail_drug(ctx, DRUG, "SN-1", "RET001", "123412341234"))
            .unwrap();
        assert_eq!(sold.owner, "123412341234");
        assert_eq!(sold.shipment.len(), 2);
        assert_eq!(ledger.last_event().unwrap().0, "retailDrug_Event");

        let history = ledger
            .submit(Organisation::Consumer, |ctx| crate::drug::view_history(ctx, DRUG, "SN-1"))
            .unwrap();
        // added, shipped, delivered, shipped, delivered, sold
        assert_eq!(history.len(), 6);
        assert_eq!(history.last().unwrap().value["owner"], "123412341234");
    }

    proptest! {
        #[test]
        fn comma_and_json_forms_agree(serials in proptest::collection::vec("[A-Za-z0-9-]{1,8}", 1..6)) {
            let csv = parse_asset_list(&serials.join(",")).unwrap();
            let json = parse_asset_list(&serde_json::to_string(&serials).unwrap()).unwrap();
            prop_assert_eq!(csv, json);
        }
    }
}
