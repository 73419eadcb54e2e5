//! Error types for the library API
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Api Error Enum ==
/// Unified error type for the library API.
///
/// Every variant maps to exactly one HTTP status. Validation and conflict
/// errors are raised before any store mutation, so a failed request never
/// leaves partial state behind.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad or missing request data (fields, pagination integers, cursors)
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Missing or wrong bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Unknown resource id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource state incompatible with the requested transition
    /// (e.g. borrowing a book that is already out)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal fault (ledger storage, fingerprinting). Never converted
    /// into a success response.
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the library API.
pub type Result<T> = std::result::Result<T, ApiError>;
