//! Common error types for Sametha

use thiserror::Error;

/// Common result type for Sametha operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Sametha crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encode/decode error outside of collection loading
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required submission field was empty after trimming
    #[error("Validation failed: {field} is required")]
    Validation { field: &'static str },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Actor lacks the role required for the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Collection exists but cannot be read back safely.
    ///
    /// Never degraded to an empty collection: writing back would destroy data.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
