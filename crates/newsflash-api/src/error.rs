//! API layer error types

use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API layer errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or cache failure, propagated unmodified
    #[error("Transport error: {0}")]
    Http(#[from] newsflash_http::HttpError),

    /// Body decoding failed, propagated from the codec unmodified
    #[error("Decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// Path did not resolve against the base endpoint
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The converter chain was exhausted without a claim
    #[error("No converter accepted the response")]
    NoConverter,

    /// The call was cancelled before completing
    #[error("Call was cancelled")]
    Cancelled,

    /// The background scheduler failed the call
    #[error("Scheduler error: {message}")]
    Scheduler { message: String },

    /// Required component missing at build time
    #[error("REST client misconfigured: {message}")]
    Builder { message: String },
}
