//! Health handler.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use tracing::trace;

use crate::config::StorageMode;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    commit: &'static str,
    storage_mode: StorageMode,
    timestamp: String,
}

/// Health check endpoint
pub(super) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    trace!("health check requested");
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        commit: env!("GIT_COMMIT_SHORT"),
        storage_mode: state.storage.mode(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
