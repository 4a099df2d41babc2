use std::sync::Arc;

use axum::{Json, Router, extract::Extension, extract::rejection::JsonRejection, http::StatusCode, routing::post};

use pharmanet_auth::Organisation;
use pharmanet_infra::{import_admin_identity, import_all_admin_identities};

use crate::app::routes::common::json_body;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/addToWallet", post(add_to_wallet))
        .route("/initializeAllIdentities", post(initialize_all_identities))
        // Path used by earlier clients.
        .route("/initializeAllIdentititiesAtOnce", post(initialize_all_identities))
}

pub async fn add_to_wallet(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::AddToWalletRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match json_body("addToWallet", body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let org: Organisation = match body.org_type.parse() {
        Ok(org) => org,
        Err(e) => return errors::invoke_error(StatusCode::BAD_REQUEST, "addToWallet", e),
    };

    match import_admin_identity(
        services.wallet(),
        services.crypto(),
        org,
        body.private_key_file_name.as_deref(),
    ) {
        Ok(_) => dto::success(format!("{org}'s User credentials added to wallet"), None),
        Err(e) => errors::wallet_error_to_response("addToWallet", e),
    }
}

pub async fn initialize_all_identities(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match import_all_admin_identities(services.wallet(), services.crypto()) {
        Ok(_) => dto::success("All organisation user credentials added to wallet", None),
        Err(e) => errors::wallet_error_to_response("initializeAllIdentities", e),
    }
}
