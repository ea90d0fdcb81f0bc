//! Common error types for Attendify

use thiserror::Error;

/// Common result type for Attendify operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Attendify service
///
/// Variants map onto the HTTP statuses used by the API crate:
/// validation and missing-field errors are client errors, conflicts
/// cover duplicate roster entries and repeated submissions, auth
/// failures carry a caller-safe message verbatim.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("{0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("{0}")]
    Validation(String),

    /// One or more required fields absent from a request; every missing
    /// field is named, not just the first
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Duplicate roster entry or repeated attendance submission
    #[error("{0}")]
    Conflict(String),

    /// Authentication failure; the message is shown to the caller as-is
    #[error("{0}")]
    Auth(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
