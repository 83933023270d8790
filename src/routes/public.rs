use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that never look at the `Authorization` header.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // The greeting the service has always answered with.
        .route("/", get(handlers::index))
        // GET /health
        // Load balancer probe.
        .route("/health", get(|| async { "ok" }))
}
