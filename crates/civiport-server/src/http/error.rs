//! API error taxonomy and response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use civiport_core::db::DatabaseError;

/// Errors surfaced to HTTP clients.
///
/// Responses carry a short machine-readable reason; internal detail is
/// logged, never echoed back.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (bad status value, empty address).
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown username or wrong password. The two are deliberately
    /// indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, stale, consumed, or mismatched one-time code.
    #[error("invalid code")]
    InvalidCode,

    /// Missing, malformed, or expired session token; or a token of the
    /// wrong type for the route.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Referenced complaint does not exist.
    #[error("not found")]
    NotFound,

    #[error("internal error")]
    Internal(String),
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::InvalidCode | Self::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(detail) => {
                error!(detail = %detail, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
