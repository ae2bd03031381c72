//! Block lifecycle error types

use thiserror::Error;

/// Errors raised by the lifecycle manager and backend implementations
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Provisioning failed for block {block_id}: {reason}")]
    Provisioning { block_id: String, reason: String },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
