//! Root-level liveness endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// What `GET /health` reports.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether `SELECT 1` against the pool succeeded.
    pub db_healthy: bool,
    /// Whether a chat-completion client is configured. `false` means every
    /// generation request runs the rule-based assembler.
    pub llm_enabled: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = yogaflow_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        llm_enabled: state.llm.is_some(),
    })
}

/// Mounted at the router root, deliberately outside `/api/v1`, so load
/// balancers probe it without a version prefix.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
