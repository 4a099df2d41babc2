use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pharmanet_core::DomainError;
use pharmanet_infra::{GatewayError, WalletError};

pub fn gateway_error_to_response(function: &str, err: GatewayError) -> axum::response::Response {
    let status = match &err {
        GatewayError::IdentityNotFound { .. } => StatusCode::UNAUTHORIZED,
        GatewayError::Chaincode(domain) => domain_status(domain),
        GatewayError::Rejected(_) => StatusCode::CONFLICT,
        GatewayError::Wallet(_) | GatewayError::WorldState(_) | GatewayError::Publish(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    invoke_error(status, function, err)
}

pub fn wallet_error_to_response(function: &str, err: WalletError) -> axum::response::Response {
    let status = match &err {
        WalletError::InvalidKeyFileName(_) => StatusCode::BAD_REQUEST,
        WalletError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND,
        WalletError::KeyNotDetected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    invoke_error(status, function, err)
}

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) | DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::InvariantViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Failure body: `{ status: "error", message: "Failed", error: "Error while invoking <fn> : <reason>" }`.
pub fn invoke_error(status: StatusCode, function: &str, reason: impl std::fmt::Display) -> axum::response::Response {
    if status.is_server_error() {
        tracing::error!(function, %reason, "request failed");
    } else {
        tracing::warn!(function, %reason, "request rejected");
    }
    (
        status,
        axum::Json(json!({
            "status": "error",
            "message": "Failed",
            "error": format!("Error while invoking {function} : {reason}"),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::invalid_id("x"), StatusCode::BAD_REQUEST),
            (DomainError::unauthorized("x"), StatusCode::FORBIDDEN),
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::invariant("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::ledger("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let response = gateway_error_to_response("f", GatewayError::Chaincode(err));
            assert_eq!(response.status(), status);
        }
    }

    #[test]
    fn missing_identity_is_unauthorized() {
        let err = GatewayError::IdentityNotFound {
            org: pharmanet_auth::Organisation::Retailer,
            label: "RETAILER_ADMIN".into(),
        };
        assert_eq!(gateway_error_to_response("f", err).status(), StatusCode::UNAUTHORIZED);
    }
}
