//! Contract routing: which functions each organisation's contract exposes,
//! and dispatch of string arguments to the business rules.

use serde::Serialize;

use pharmanet_auth::Organisation;
use pharmanet_core::{DomainError, DomainResult};

use crate::NAMESPACE;
use crate::context::TxContext;
use crate::{company, drug, order, shipment};

/// A contract deployed in the chaincode, one per trading organisation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ContractName {
    Manufacturer,
    Distributor,
    Retailer,
    Transporter,
}

impl ContractName {
    pub const ALL: [ContractName; 4] = [
        ContractName::Manufacturer,
        ContractName::Distributor,
        ContractName::Retailer,
        ContractName::Transporter,
    ];

    /// Contract an organisation's gateway connects to. Consumers have no
    /// contract of their own and use the manufacturer's.
    pub fn for_organisation(org: Organisation) -> Self {
        match org {
            Organisation::Manufacturer | Organisation::Consumer => ContractName::Manufacturer,
            Organisation::Distributor => ContractName::Distributor,
            Organisation::Retailer => ContractName::Retailer,
            Organisation::Transporter => ContractName::Transporter,
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            ContractName::Manufacturer => "manufacturer",
            ContractName::Distributor => "distributor",
            ContractName::Retailer => "retailer",
            ContractName::Transporter => "transporter",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            ContractName::Manufacturer => "Manufacturer",
            ContractName::Distributor => "Distributor",
            ContractName::Retailer => "Retailer",
            ContractName::Transporter => "Transporter",
        }
    }

    /// Fully qualified name, e.g. `org.pharma-network.pharmanet.retailer`.
    pub fn qualified_name(self) -> String {
        format!("{NAMESPACE}.{}", self.short_name())
    }

    pub fn functions(self) -> &'static [Function] {
        use Function::*;
        match self {
            ContractName::Manufacturer => &[
                Instantiate,
                RegisterCompany,
                AddDrug,
                CreateShipment,
                ViewCompany,
                ViewShipment,
                ViewHistory,
                ViewDrugCurrentState,
            ],
            ContractName::Distributor => &[
                Instantiate,
                RegisterCompany,
                CreatePo,
                CreateShipment,
                ViewCompany,
                ViewShipment,
                ViewHistory,
                ViewDrugCurrentState,
            ],
            ContractName::Retailer => &[
                Instantiate,
                RegisterCompany,
                CreatePo,
                CreateShipment,
                RetailDrug,
                ViewCompany,
                ViewShipment,
                ViewHistory,
                ViewDrugCurrentState,
            ],
            ContractName::Transporter => &[
                Instantiate,
                RegisterCompany,
                UpdateShipment,
                ViewCompany,
                ViewShipment,
                ViewHistory,
                ViewDrugCurrentState,
            ],
        }
    }

    pub fn exposes(self, function: Function) -> bool {
        self.functions().contains(&function)
    }
}

impl core::fmt::Display for ContractName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// A chaincode function, addressed by its transaction name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Instantiate,
    RegisterCompany,
    AddDrug,
    CreatePo,
    CreateShipment,
    UpdateShipment,
    RetailDrug,
    ViewCompany,
    ViewShipment,
    ViewHistory,
    ViewDrugCurrentState,
}

impl Function {
    pub const ALL: [Function; 11] = [
        Function::Instantiate,
        Function::RegisterCompany,
        Function::AddDrug,
        Function::CreatePo,
        Function::CreateShipment,
        Function::UpdateShipment,
        Function::RetailDrug,
        Function::ViewCompany,
        Function::ViewShipment,
        Function::ViewHistory,
        Function::ViewDrugCurrentState,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Instantiate => "instantiate",
            Function::RegisterCompany => "registerCompany",
            Function::AddDrug => "addDrug",
            Function::CreatePo => "createPO",
            Function::CreateShipment => "createShipment",
            Function::UpdateShipment => "updateShipment",
            Function::RetailDrug => "retailDrug",
            Function::ViewCompany => "viewCompany",
            Function::ViewShipment => "viewShipment",
            Function::ViewHistory => "viewHistory",
            Function::ViewDrugCurrentState => "viewDrugCurrentState",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Number of string arguments the function takes.
    pub fn arity(self) -> usize {
        match self {
            Function::Instantiate => 0,
            Function::ViewCompany => 1,
            Function::ViewShipment | Function::ViewHistory | Function::ViewDrugCurrentState => 2,
            Function::UpdateShipment => 3,
            Function::RegisterCompany | Function::CreatePo | Function::CreateShipment | Function::RetailDrug => 4,
            Function::AddDrug => 5,
        }
    }

    /// Read-only functions never write state and are evaluated rather than submitted.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            Function::ViewCompany | Function::ViewShipment | Function::ViewHistory | Function::ViewDrugCurrentState
        )
    }
}

impl core::fmt::Display for Function {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

fn encode<T: Serialize>(value: &T) -> DomainResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Run `function_name` of `contract` with positional string arguments and
/// return its JSON-encoded result.
pub fn invoke(
    ctx: &mut TxContext<'_>,
    contract: ContractName,
    function_name: &str,
    args: &[String],
) -> DomainResult<Vec<u8>> {
    let function = Function::parse(function_name)
        .filter(|f| contract.exposes(*f))
        .ok_or_else(|| {
            DomainError::validation(format!("function '{function_name}' is not exposed by contract {contract}"))
        })?;
    if args.len() != function.arity() {
        return Err(DomainError::validation(format!(
            "{function} expects {} arguments, got {}",
            function.arity(),
            args.len()
        )));
    }

    let a: Vec<&str> = args.iter().map(String::as_str).collect();
    match function {
        Function::Instantiate => encode(&format!(
            "PharmaNet - {} Smart Contract Instantiated",
            contract.display_name()
        )),
        Function::RegisterCompany => encode(&company::register_company(ctx, a[0], a[1], a[2], a[3])?),
        Function::AddDrug => encode(&drug::add_drug(ctx, a[0], a[1], a[2], a[3], a[4])?),
        Function::CreatePo => encode(&order::create_po(ctx, a[0], a[1], a[2], a[3])?),
        Function::CreateShipment => encode(&shipment::create_shipment(ctx, a[0], a[1], a[2], a[3])?),
        Function::UpdateShipment => encode(&shipment::update_shipment(ctx, a[0], a[1], a[2])?),
        Function::RetailDrug => encode(&drug::retail_drug(ctx, a[0], a[1], a[2], a[3])?),
        Function::ViewCompany => encode(&company::view_company(ctx, a[0])?),
        Function::ViewShipment => encode(&shipment::view_shipment(ctx, a[0], a[1])?),
        Function::ViewHistory => encode(&drug::view_history(ctx, a[0], a[1])?),
        Function::ViewDrugCurrentState => encode(&drug::view_drug_current_state(ctx, a[0], a[1])?),
    }
}
