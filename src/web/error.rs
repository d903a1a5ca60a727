//! JSON error responses.

use crate::state::LookupError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::{error, warn};

const SERVICE_NAME: &str = "standings";

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    service_name: &'static str,
    error_code: u16,
    description: String,
}

impl ApiError {
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            service_name: SERVICE_NAME,
            error_code: status.as_u16(),
            description: description.into(),
        }
    }

    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, description)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match &err {
            LookupError::UnknownLeague(_) | LookupError::NoData(_) => Self::not_found(err.to_string()),
            LookupError::InvalidSeason(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            LookupError::Upstream { .. } => {
                warn!(error = ?err, "upstream fetch failed");
                Self::new(StatusCode::BAD_GATEWAY, "standings source unavailable")
            }
            LookupError::Storage(storage) => {
                error!(error = ?err, key = storage.key(), timed_out = storage.is_timeout(), "storage failure");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "standings storage unavailable")
            }
        }
    }
}
