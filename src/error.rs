//! Client error taxonomy.
//!
//! Nothing here is fatal: every error is a value the embedding view can
//! render inline and recover from by navigation or reload.

use thiserror::Error;

use crate::{
    services::channel::ChannelError,
    state::{lifecycle::InvalidTransition, play::SubmitError},
    store::StoreError,
};

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the MindMuse client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP request itself failed (connection, TLS, timeout).
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered but rejected the request (bad join code,
    /// contest full, contest not found).
    #[error("{message}")]
    Api {
        /// Server-provided reason shown to the user.
        message: String,
    },
    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A real-time request was acknowledged with a business-rule rejection;
    /// the triggering control stays disabled instead of navigating away.
    #[error("rejected: {0}")]
    Rejected(String),
    /// The real-time channel failed.
    #[error("channel error")]
    Channel(#[from] ChannelError),
    /// Outbound request payload failed local validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A lifecycle event arrived that the current phase cannot accept.
    #[error("lifecycle error")]
    Lifecycle(#[from] InvalidTransition),
    /// An answer submission was refused before reaching the wire.
    #[error("submission refused")]
    Submission(#[from] SubmitError),
    /// Local persistence failed.
    #[error("store error")]
    Store(#[from] StoreError),
}

impl ClientError {
    /// Error for a `success: false` envelope, preferring the server's
    /// message.
    pub fn api(message: Option<String>, fallback: &str) -> Self {
        ClientError::Api {
            message: message.unwrap_or_else(|| fallback.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        ClientError::InvalidInput(err.to_string())
    }
}
