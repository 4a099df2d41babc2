use std::sync::Arc;

use axum::{Json, Router, extract::Extension, extract::rejection::JsonRejection, routing::post};

use pharmanet_chaincode::Function;

use crate::app::dto;
use crate::app::routes::common::{json_body, run_transaction};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/createShipment", post(create_shipment))
        .route("/updateShipment", post(update_shipment))
        .route("/viewShipment", post(view_shipment))
}

pub async fn create_shipment(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateShipmentRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::CreateShipment.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let assets = body.list_of_assets.into_arg();
    run_transaction(
        &services,
        &body.org_type,
        Function::CreateShipment,
        &[&body.buyer_crn, &body.drug_name, &assets, &body.transporter_crn],
        "Shipment created",
    )
}

pub async fn update_shipment(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::UpdateShipmentRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::UpdateShipment.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    run_transaction(
        &services,
        &body.org_type,
        Function::UpdateShipment,
        &[&body.buyer_crn, &body.drug_name, &body.transporter_crn],
        "Shipment delivered",
    )
}

pub async fn view_shipment(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ViewShipmentRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::ViewShipment.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    run_transaction(
        &services,
        &body.org_type,
        Function::ViewShipment,
        &[&body.buyer_crn, &body.drug_name],
        "Shipment details",
    )
}
