//! Client Error Types
//!
//! Every failure a screen can see while talking to the backend, and the
//! conversion from transport errors into them.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced to screens
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: DNS, connect, TLS, reset, timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status with a readable message from the error body
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend rejected the bearer credential. The session has already
    /// been logged out by the time this is returned.
    #[error("Unauthorized")]
    Unauthorized,

    /// The response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Persistent session storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Rejected before any request was made
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    /// HTTP status, when the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else if err.is_builder() {
            ClientError::Validation(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
