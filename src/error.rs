//! Error types for docfeed

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Every failure aborts the operation it occurred in; there is no
/// partial-success mode. Producer runs either complete or report failure,
/// and a consumer traversal stops at the first bad fetch or bad page.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The extractor failed on a source item. Fatal to the enclosing
    /// digestion batch; documents are not isolated from each other.
    #[error("Extraction failed for '{id}': {message}")]
    Extraction { id: String, message: String },

    /// A meta or page fetch failed, over HTTP or from disk.
    #[error("Transport error for {location}: {message}")]
    Transport { location: String, message: String },

    /// A fetched document did not parse into the expected shape.
    #[error("Schema error in {location}: {message}")]
    Schema { location: String, message: String },

    /// A file could not be published to its final path.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            other => {
                tracing::error!("Internal error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
