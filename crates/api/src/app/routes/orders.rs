use std::sync::Arc;

use axum::{Json, Router, extract::Extension, extract::rejection::JsonRejection, routing::post};

use pharmanet_chaincode::Function;

use crate::app::dto;
use crate::app::routes::common::{json_body, run_transaction};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/createPO", post(create_po))
}

pub async fn create_po(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreatePoRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::CreatePo.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let quantity = body.quantity.into_arg();
    run_transaction(
        &services,
        &body.org_type,
        Function::CreatePo,
        &[&body.buyer_crn, &body.seller_crn, &body.drug_name, &quantity],
        "Purchase order created",
    )
}
