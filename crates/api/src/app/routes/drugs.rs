use std::sync::Arc;

use axum::{Json, Router, extract::Extension, extract::rejection::JsonRejection, routing::post};

use pharmanet_chaincode::Function;

use crate::app::dto;
use crate::app::routes::common::{json_body, run_transaction};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/addDrug", post(add_drug))
        .route("/retailDrug", post(retail_drug))
        .route("/viewHistory", post(view_history))
        .route("/viewDrugCurrentState", post(view_drug_current_state))
}

pub async fn add_drug(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AddDrugRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::AddDrug.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    run_transaction(
        &services,
        &body.org_type,
        Function::AddDrug,
        &[&body.drug_name, &body.serial_no, &body.mfg_date, &body.exp_date, &body.company_crn],
        "New drug added",
    )
}

pub async fn retail_drug(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RetailDrugRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::RetailDrug.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    run_transaction(
        &services,
        &body.org_type,
        Function::RetailDrug,
        &[&body.drug_name, &body.serial_no, &body.retailer_crn, &body.customer_aadhar],
        "Drug sold to customer",
    )
}

pub async fn view_history(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::DrugRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::ViewHistory.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    run_transaction(
        &services,
        &body.org_type,
        Function::ViewHistory,
        &[&body.drug_name, &body.serial_no],
        "Drug history",
    )
}

pub async fn view_drug_current_state(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::DrugRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::ViewDrugCurrentState.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    run_transaction(
        &services,
        &body.org_type,
        Function::ViewDrugCurrentState,
        &[&body.drug_name, &body.serial_no],
        "Drug current state",
    )
}
