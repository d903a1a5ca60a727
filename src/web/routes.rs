//! Web API router construction.

use axum::http::StatusCode;
use axum::{Router, routing::get};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

use crate::state::AppState;
use crate::web::error::ApiError;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{standings, status};

/// Upper bound on a whole request, upstream fetch included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(status::health))
        .route(
            "/standings/{league}/{season}",
            get(standings::get_standings),
        )
        .fallback(not_found)
        .with_state(app_state)
        .layer((
            // Outermost: per-request ID span + severity-proportional response logging.
            RequestIdLayer,
            timeout_layer(REQUEST_TIMEOUT),
        ))
}

/// Requests still running after `limit` are answered with 408.
fn timeout_layer(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

async fn not_found() -> ApiError {
    ApiError::not_found("no such route")
}
