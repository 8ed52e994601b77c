//! Common error types for FrameQuiz

use thiserror::Error;

/// Common result type for FrameQuiz operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across FrameQuiz crates
///
/// Every variant is recoverable at the request level; the HTTP layer maps
/// them onto status codes.
#[derive(Error, Debug)]
pub enum Error {
    /// Game session id unknown or purged; caller must start a new game
    #[error("No session: {0}")]
    SessionNotFound(String),

    /// Film image id unknown
    #[error("Invalid image: {0}")]
    ImageNotFound(i64),

    /// Image exists but carries no hints
    #[error("No hints available for image {0}")]
    NoHints(i64),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
