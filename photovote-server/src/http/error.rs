//! API error types with IntoResponse
//!
//! Errors are converted to JSON `{"error", "message"}` bodies with the
//! matching status code. Infrastructure failures are logged and masked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;
use crate::storage::BlobError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Client input rejected (400)
    Validation(ValidationError),

    /// Per-user quota exhausted (400)
    LimitReached { what: &'static str, max: i64 },

    /// Request named a user, category or photo that does not exist (400)
    UnknownReference,

    /// Endpoint exists but not for this method (405)
    MethodNotAllowed,

    /// Database error (500, logged)
    Database(DbError),

    /// Blob store error (500, logged)
    Storage(BlobError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::LimitReached { .. } | Self::UnknownReference => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Database(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::Validation(e) => json!({
                "error": "validation_error",
                "message": e.to_string()
            }),
            Self::LimitReached { what, max } => json!({
                "error": "validation_error",
                "message": format!("maximum {} {}", max, what)
            }),
            Self::UnknownReference => json!({
                "error": "validation_error",
                "message": "referenced user, category or photo does not exist"
            }),
            Self::MethodNotAllowed => json!({
                "error": "method_not_allowed",
                "message": "method not allowed"
            }),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                internal_body()
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                internal_body()
            }
        };

        (self.status(), Json(body)).into_response()
    }
}

fn internal_body() -> serde_json::Value {
    json!({
        "error": "internal_error",
        "message": "an internal error occurred"
    })
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        if e.is_unknown_reference() {
            return Self::UnknownReference;
        }
        match e {
            DbError::LimitReached { what, max } => Self::LimitReached { what, max },
            _ => Self::Database(e),
        }
    }
}

impl From<BlobError> for ApiError {
    fn from(e: BlobError) -> Self {
        Self::Storage(e)
    }
}
