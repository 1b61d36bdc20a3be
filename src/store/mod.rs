//! Durable per-device state: the auth session record, the completion
//! ledger, and the practice result history.
//!
//! Backends implement [`StateStore`]; the library ships a JSON-file backend
//! and an in-memory one for tests and ephemeral embedding.

pub mod file;
pub mod ledger;
pub mod memory;
pub mod practice_log;
pub mod session;

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::dto::{contest::AuthUser, practice::PracticeResult};

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by state store backends regardless of the underlying medium.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be read or written.
    #[error("state store unavailable: {message}")]
    Unavailable {
        /// What the store was doing when it failed.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A persisted record could not be decoded.
    #[error("corrupt state record `{key}`")]
    Corrupt {
        /// The record that failed to decode.
        key: String,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StoreError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Abstraction over the per-device persistence layer.
///
/// All access happens on a single-threaded event loop's terms: read-mostly,
/// written rarely, overwrite semantics with no locking beyond the backend's
/// own.
pub trait StateStore: Send + Sync {
    /// Load the persisted auth user, if a session was saved.
    fn load_user(&self) -> BoxFuture<'static, StoreResult<Option<AuthUser>>>;
    /// Persist or clear the auth user record.
    fn save_user(&self, user: Option<AuthUser>) -> BoxFuture<'static, StoreResult<()>>;
    /// Load the set of contest ids this device has completed.
    fn load_completed(&self) -> BoxFuture<'static, StoreResult<Vec<String>>>;
    /// Overwrite the completed contest id set.
    fn save_completed(&self, ids: Vec<String>) -> BoxFuture<'static, StoreResult<()>>;
    /// Load the practice result history, oldest first.
    fn load_practice_results(&self) -> BoxFuture<'static, StoreResult<Vec<PracticeResult>>>;
    /// Append one practice result to the history.
    fn append_practice_result(&self, result: PracticeResult)
    -> BoxFuture<'static, StoreResult<()>>;
}
