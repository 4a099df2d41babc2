use axum::{Router, routing::get};

pub mod common;
pub mod companies;
pub mod drugs;
pub mod orders;
pub mod shipments;
pub mod system;
pub mod wallet;

/// Router for every PharmaNet endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::index))
        .route("/health", get(system::health))
        .route("/events", get(system::events))
        .merge(wallet::router())
        .merge(companies::router())
        .merge(drugs::router())
        .merge(orders::router())
        .merge(shipments::router())
}
