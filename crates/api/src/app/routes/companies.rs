use std::sync::Arc;

use axum::{Json, Router, extract::Extension, extract::rejection::JsonRejection, routing::post};

use pharmanet_chaincode::Function;

use crate::app::dto;
use crate::app::routes::common::{json_body, run_transaction};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/registerCompany", post(register_company))
        .route("/viewCompany", post(view_company))
}

pub async fn register_company(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterCompanyRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::RegisterCompany.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    run_transaction(
        &services,
        &body.org_type,
        Function::RegisterCompany,
        &[&body.company_crn, &body.company_name, &body.location, &body.organisation_role],
        "New company registered",
    )
}

pub async fn view_company(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ViewCompanyRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body(Function::ViewCompany.name(), body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    run_transaction(&services, &body.org_type, Function::ViewCompany, &[&body.company_crn], "Company details")
}
