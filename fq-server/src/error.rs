//! Error types for fq-server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request body or query (400)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Errors from the game core
    #[error(transparent)]
    Game(#[from] fq_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use fq_common::Error as GameError;

        let (status, error_code, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),
            ApiError::Game(err) => match err {
                GameError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "NO_SESSION", err.to_string()),
                GameError::ImageNotFound(_) => (StatusCode::NOT_FOUND, "INVALID_IMAGE", err.to_string()),
                GameError::NoHints(_) => (StatusCode::BAD_REQUEST, "NO_HINTS", err.to_string()),
                GameError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", err.to_string()),
                other => {
                    error!("Request failed: {}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
