use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "bug-report-api";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether reports are persisted (false in log-only mode).
    pub storage_configured: bool,
    /// Whether report summaries are forwarded to log ingestion.
    pub forwarding_enabled: bool,
}

/// GET /health -- liveness probe; never touches the storage backend.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        storage_configured: state.store.is_some(),
        forwarding_enabled: state.forwarder.is_some(),
    })
}

/// Mount health check routes (root level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
