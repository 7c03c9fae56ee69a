//! HTTP API handlers

pub mod health;
pub mod people;
pub mod planets;

pub use health::health_routes;
pub use people::get_people;
pub use planets::get_planets;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orrery_common::api::ErrorBody;
use orrery_common::Error;

/// Handler-facing error type.
///
/// Client errors carry a machine-readable reason; server errors are opaque
/// (no upstream detail leaked — the operator log line has it).
#[derive(Debug)]
pub enum ApiError {
    InvalidParameter(String),
    UpstreamUnavailable,
    Internal,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidParameter(reason) => ApiError::InvalidParameter(reason),
            Error::UpstreamUnavailable(_) => ApiError::UpstreamUnavailable,
            other => {
                tracing::error!(error = %other, "Aggregation failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidParameter(reason) => (StatusCode::BAD_REQUEST, reason),
            ApiError::UpstreamUnavailable => (
                StatusCode::BAD_GATEWAY,
                "Upstream registry unavailable".to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorBody { error: message });

        (status, body).into_response()
    }
}
