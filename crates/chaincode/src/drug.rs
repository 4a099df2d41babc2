//! Drug units: manufacture, retail sale and provenance queries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use pharmanet_auth::Organisation;
use pharmanet_core::{DomainError, DomainResult, DrugName, Entity, SerialNo, TxId, create_composite_key};

use crate::company::{OrganisationRole, find_company};
use crate::context::TxContext;

pub const DRUG_OBJECT_TYPE: &str = "org.pharma-network.pharmanet.drug";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ledger record: one serialised unit of a drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    #[serde(rename = "productID")]
    pub product_id: String,
    pub name: DrugName,
    pub serial_no: SerialNo,
    /// Company key of the manufacturer.
    pub manufacturer: String,
    pub manufacturing_date: NaiveDate,
    pub expiry_date: NaiveDate,
    /// Company key of the current holder, or the customer's Aadhaar number once sold.
    pub owner: String,
    /// Keys of the shipments this unit was delivered in, oldest first.
    #[serde(default)]
    pub shipment: Vec<String>,
}

impl Entity for Drug {
    const OBJECT_TYPE: &'static str = DRUG_OBJECT_TYPE;

    fn key(&self) -> &str {
        &self.product_id
    }
}

/// One committed version of a drug, as returned by `viewHistory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugHistoryEntry {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    pub value: serde_json::Value,
}

pub(crate) fn drug_key(name: &DrugName, serial: &SerialNo) -> DomainResult<String> {
    create_composite_key(DRUG_OBJECT_TYPE, &[name.as_str(), serial.as_str()])
}

fn parse_date(raw: &str, field: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::validation(format!("{field} '{raw}' is not a YYYY-MM-DD date")))
}

pub(crate) fn load_drug(ctx: &mut TxContext<'_>, key: &str) -> DomainResult<Option<Drug>> {
    ctx.read(key)
}

/// Register a newly manufactured drug unit. Only manufacturers may call this,
/// and only for a company registered as a manufacturer.
pub fn add_drug(
    ctx: &mut TxContext<'_>,
    drug_name: &str,
    serial_no: &str,
    mfg_date: &str,
    exp_date: &str,
    company_crn: &str,
) -> DomainResult<Drug> {
    ctx.require("addDrug", &[Organisation::Manufacturer])?;

    let name = DrugName::parse(drug_name)?;
    let serial = SerialNo::parse(serial_no)?;
    let manufacturing_date = parse_date(mfg_date, "mfgDate")?;
    let expiry_date = parse_date(exp_date, "expDate")?;
    if expiry_date <= manufacturing_date {
        return Err(DomainError::validation("expDate must be after mfgDate"));
    }

    let manufacturer = find_company(ctx, company_crn, "MANUFACTURER")?;
    if manufacturer.organisation_role != OrganisationRole::Manufacturer {
        return Err(DomainError::invariant(format!(
            "company {} is a {}, not a MANUFACTURER",
            manufacturer.crn, manufacturer.organisation_role
        )));
    }

    let product_id = drug_key(&name, &serial)?;
    if load_drug(ctx, &product_id)?.is_some() {
        return Err(DomainError::conflict(format!(
            "Drug {name} with serial no {serial} is already registered"
        )));
    }

    let drug = Drug {
        product_id,
        name,
        serial_no: serial,
        manufacturer: manufacturer.company_id.clone(),
        manufacturing_date,
        expiry_date,
        owner: manufacturer.company_id,
        shipment: Vec::new(),
    };
    ctx.write(&drug)?;
    Ok(drug)
}

/// Sell a drug unit to a consumer. Only the retailer that owns the unit may sell it.
pub fn retail_drug(
    ctx: &mut TxContext<'_>,
    drug_name: &str,
    serial_no: &str,
    retailer_crn: &str,
    customer_aadhar: &str,
) -> DomainResult<Drug> {
    ctx.require("retailDrug", &[Organisation::Retailer])?;

    let name = DrugName::parse(drug_name)?;
    let serial = SerialNo::parse(serial_no)?;
    let customer = customer_aadhar.trim();
    if customer.is_empty() {
        return Err(DomainError::validation("customerAadhar must not be empty"));
    }

    let retailer = find_company(ctx, retailer_crn, "RETAILER")?;
    if retailer.organisation_role != OrganisationRole::Retailer {
        return Err(DomainError::invariant(format!(
            "company {} is a {}, not a RETAILER",
            retailer.crn, retailer.organisation_role
        )));
    }

    let key = drug_key(&name, &serial)?;
    let mut drug = load_drug(ctx, &key)?
        .ok_or_else(|| DomainError::not_found(format!("Drug {name} with serial no {serial}")))?;
    if drug.owner != retailer.company_id {
        return Err(DomainError::invariant(format!(
            "retailer {} does not own drug {name} ({serial})",
            retailer.crn
        )));
    }

    drug.owner = customer.to_string();
    ctx.write(&drug)?;
    ctx.emit("retailDrug_Event", &drug)?;
    Ok(drug)
}

pub fn view_drug_current_state(ctx: &mut TxContext<'_>, drug_name: &str, serial_no: &str) -> DomainResult<Drug> {
    let name = DrugName::parse(drug_name)?;
    let serial = SerialNo::parse(serial_no)?;
    let key = drug_key(&name, &serial)?;
    load_drug(ctx, &key)?.ok_or_else(|| DomainError::not_found(format!("Drug {name} with serial no {serial}")))
}

/// Every committed version of a drug unit, oldest first.
pub fn view_history(ctx: &mut TxContext<'_>, drug_name: &str, serial_no: &str) -> DomainResult<Vec<DrugHistoryEntry>> {
    let name = DrugName::parse(drug_name)?;
    let serial = SerialNo::parse(serial_no)?;
    let key = drug_key(&name, &serial)?;

    let history = ctx.stub.get_history_for_key(&key)?;
    if history.is_empty() {
        return Err(DomainError::not_found(format!("Drug {name} with serial no {serial}")));
    }

    history
        .into_iter()
        .map(|modification| {
            Ok(DrugHistoryEntry {
                tx_id: modification.tx_id,
                timestamp: modification.timestamp,
                value: serde_json::from_slice(&modification.value)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLedger;

    fn add(ledger: &mut MockLedger, serial: &str, crn: &str) -> DomainResult<Drug> {
        ledger.submit(Organisation::Manufacturer, |ctx| {
            add_drug(ctx, "Paracetamol", serial, "2024-03-01", "2026-03-01", crn)
        })
    }

    #[test]
    fn manufacturer_adds_drug_and_owns_it() {
        let mut ledger = MockLedger::with_companies();
        let drug = add(&mut ledger, "SN-1", "MAN001").unwrap();

        assert!(drug.manufacturer.contains("MAN001"));
        assert_eq!(drug.owner, drug.manufacturer);
        assert!(drug.shipment.is_empty());

        let json = serde_json::to_value(&drug).unwrap();
        assert_eq!(json["manufacturingDate"], "2024-03-01");
        assert_eq!(json["productID"], drug.product_id);
    }

    #[test]
    fn only_manufacturer_msp_may_add_drugs() {
        let mut ledger = MockLedger::with_companies();
        let err = ledger
            .submit(Organisation::Distributor, |ctx| {
                add_drug(ctx, "Paracetamol", "SN-1", "2024-03-01", "2026-03-01", "MAN001")
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn company_must_be_a_registered_manufacturer() {
        let mut ledger = MockLedger::with_companies();
        assert!(matches!(add(&mut ledger, "SN-1", "NOPE").unwrap_err(), DomainError::NotFound(_)));
        assert!(matches!(
            add(&mut ledger, "SN-1", "DIST001").unwrap_err(),
            DomainError::InvariantViolation(_)
        ));
    }

    #[test]
    fn duplicate_serial_is_rejected() {
        let mut ledger = MockLedger::with_companies();
        add(&mut ledger, "SN-1", "MAN001").unwrap();
        assert!(matches!(add(&mut ledger, "SN-1", "MAN001").unwrap_err(), DomainError::Conflict(_)));
    }

    #[test]
    fn dates_are_validated() {
        let mut ledger = MockLedger::with_companies();
        let err = ledger
            .submit(Organisation::Manufacturer, |ctx| {
                add_drug(ctx, "Paracetamol", "SN-1", "01/03/2024", "2026-03-01", "MAN001")
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("mfgDate")));

        let err = ledger
            .submit(Organisation::Manufacturer, |ctx| {
                add_drug(ctx, "Paracetamol", "SN-1", "2026-03-01", "2024-03-01", "MAN001")
            })
            .unwrap_err();
        assert_eq!(err, DomainError::validation("expDate must be after mfgDate"));
    }

    #[test]
    fn retailer_must_own_the_drug_to_sell_it() {
        let mut ledger = MockLedger::with_companies();
        add(&mut ledger, "SN-1", "MAN001").unwrap();

        let err = ledger
            .submit(Organisation::Retailer, |ctx| {
                retail_drug(ctx, "Paracetamol", "SN-1", "RET001", "123412341234")
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(msg) if msg.contains("does not own")));
    }

    #[test]
    fn view_history_lists_committed_versions() {
        let mut ledger = MockLedger::with_companies();
        add(&mut ledger, "SN-1", "MAN001").unwrap();

        let history = ledger
            .submit(Organisation::Consumer, |ctx| view_history(ctx, "Paracetamol", "SN-1"))
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].value["serialNo"], "SN-1");

        let err = ledger
            .submit(Organisation::Consumer, |ctx| view_history(ctx, "Paracetamol", "SN-404"))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn view_current_state_of_unknown_drug_is_not_found() {
        let mut ledger = MockLedger::with_companies();
        let err = ledger
            .submit(Organisation::Transporter, |ctx| view_drug_current_state(ctx, "Paracetamol", "SN-1"))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
