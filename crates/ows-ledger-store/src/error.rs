//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A storage path could not be derived or used.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
