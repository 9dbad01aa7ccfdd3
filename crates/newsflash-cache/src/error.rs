//! Cache-related error types

use thiserror::Error;

/// Cache operation errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Entry encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },
}

/// Re-export commonly used Result type
pub type Result<T> = std::result::Result<T, CacheError>;
