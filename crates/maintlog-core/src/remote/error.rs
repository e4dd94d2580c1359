//! Remote adapter errors.
//!
//! These never leave the record store: every mirror failure is logged and
//! swallowed there.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// No remote backend is configured
    #[error("Remote backend is not configured")]
    NotConfigured,

    /// Connection, TLS or timeout failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The backend answered with a non-success HTTP status
    #[error("Remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The endpoint answered `success: false`
    #[error("Remote rejected the request: {0}")]
    Rejected(String),

    /// The response body could not be understood
    #[error("Cannot decode remote response: {0}")]
    Decode(String),

    /// The backend has no equivalent of the requested operation
    #[error("The {backend} backend does not support {operation}")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Decode(err.to_string())
    }
}
