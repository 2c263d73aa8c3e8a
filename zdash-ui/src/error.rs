//! Error types for zdash-ui

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::zotero::ZoteroError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// No library loaded yet (409)
    #[error("No library data loaded")]
    NoData,

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Zotero API failure
    #[error("Zotero error: {0}")]
    Zotero(#[from] ZoteroError),

    /// zdash-common error
    #[error("Common error: {0}")]
    Common(#[from] zdash_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::NoData => (
                StatusCode::CONFLICT,
                "NO_DATA",
                "Connect a Zotero library first".to_string(),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Zotero(ref err) => match err {
                ZoteroError::Forbidden => (StatusCode::FORBIDDEN, "ZOTERO_FORBIDDEN", err.to_string()),
                ZoteroError::LibraryNotFound(_) => {
                    (StatusCode::NOT_FOUND, "ZOTERO_LIBRARY_NOT_FOUND", err.to_string())
                }
                _ => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string()),
            },
            ApiError::Common(ref err) => match err {
                zdash_common::Error::InvalidInput(_) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string())
                }
                zdash_common::Error::InvalidDate { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_DATE", err.to_string())
                }
                zdash_common::Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR", err.to_string()),
            },
        };

        if status.is_server_error() {
            tracing::error!(code = error_code, "{}", message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
