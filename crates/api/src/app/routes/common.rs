use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use pharmanet_auth::Organisation;
use pharmanet_chaincode::Function;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Parse `orgType`, run `function` through that organisation's gateway and
/// render the standard success/failure body.
pub fn run_transaction(
    services: &AppServices,
    org_type: &str,
    function: Function,
    args: &[&str],
    message: &str,
) -> axum::response::Response {
    let org: Organisation = match org_type.parse() {
        Ok(org) => org,
        Err(e) => return errors::invoke_error(StatusCode::BAD_REQUEST, function.name(), e),
    };

    match services.transact(org, function, args) {
        Ok(data) => dto::success(message, Some(data)),
        Err(e) => errors::gateway_error_to_response(function.name(), e),
    }
}

/// Unwrap a JSON body, turning a malformed or incomplete one into the standard
/// failure body with 400.
pub fn json_body<T>(function: &str, body: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(errors::invoke_error(StatusCode::BAD_REQUEST, function, rejection.body_text())),
    }
}
