use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::sse::Event as SseEvent};

use crate::app::services::{self, AppServices};

pub async fn index() -> &'static str {
    "Hello Blockchain World, Here comes our hyperledger fabric based PharmaNet App"
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /events: committed chaincode events as server-sent events.
pub async fn events(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Sse<impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>> {
    services::event_sse_stream(services)
}
