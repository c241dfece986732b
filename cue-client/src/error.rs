//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally before any request was issued
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP request failed at the network layer
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Snapshot subscription failed or was closed
    #[error("Stream error: {0}")]
    Stream(String),

    /// Server answered with a non-success status
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
