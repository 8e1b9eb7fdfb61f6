//! Error types shared by the store, the remote adapters and import/export

use thiserror::Error;

/// Failure reported by a remote collaborator
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("rejected by backend: {0}")]
    Rejected(String),
}

impl RemoteError {
    /// Network failures, rate limiting and server errors are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Network(_) => true,
            RemoteError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("remote write failed: {0}")]
    RemoteWrite(RemoteError),

    #[error("remote fetch failed: {0}")]
    RemoteRead(RemoteError),

    #[error("project not found: {0}")]
    NotFound(String),

    #[error("could not parse import: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
