//! Health check endpoints.
//!
//! Provides endpoints for monitoring server health and readiness.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Server status
    pub status: &'static str,
    /// Server version
    pub version: &'static str,
}

/// Liveness check: the server is running
///
/// GET /health/live
async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check
///
/// GET /health/ready
///
/// Without a webhook the server still serves requests, but every chat reply
/// is an error message, so it reports itself as degraded.
async fn readiness(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let webhook_ok = state.webhook_configured();

    Json(ReadinessResponse {
        status: if webhook_ok { "ready" } else { "degraded" },
        webhook: if webhook_ok { "configured" } else { "missing" },
    })
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub webhook: &'static str,
}

/// Create health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}
