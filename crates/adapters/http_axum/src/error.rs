//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use garage_bridge_domain::error::GarageError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`GarageError`] and malformed request bodies to HTTP responses.
pub enum ApiError {
    Domain(GarageError),
    BadRequest(String),
}

impl From<GarageError> for ApiError {
    fn from(err: GarageError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Domain(GarageError::Validation(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Domain(GarageError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Domain(GarageError::NotReady(err)) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            Self::Domain(GarageError::Remote(err)) => {
                tracing::error!(error = %err, "remote hub error");
                (StatusCode::BAD_GATEWAY, "remote hub error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
