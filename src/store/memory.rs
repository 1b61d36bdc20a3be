//! In-memory [`StateStore`] backend for tests and ephemeral embedding.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::{
    dto::{contest::AuthUser, practice::PracticeResult},
    store::{StateStore, StoreResult},
};

#[derive(Debug, Default)]
struct Inner {
    user: Option<AuthUser>,
    completed: Vec<String>,
    practice: Vec<PracticeResult>,
}

/// Store that keeps everything in process memory. Cloning shares the state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl StateStore for MemoryStore {
    fn load_user(&self) -> BoxFuture<'static, StoreResult<Option<AuthUser>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.lock().await.user.clone()) })
    }

    fn save_user(&self, user: Option<AuthUser>) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.lock().await.user = user;
            Ok(())
        })
    }

    fn load_completed(&self) -> BoxFuture<'static, StoreResult<Vec<String>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.lock().await.completed.clone()) })
    }

    fn save_completed(&self, ids: Vec<String>) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.lock().await.completed = ids;
            Ok(())
        })
    }

    fn load_practice_results(&self) -> BoxFuture<'static, StoreResult<Vec<PracticeResult>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.lock().await.practice.clone()) })
    }

    fn append_practice_result(
        &self,
        result: PracticeResult,
    ) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.lock().await.practice.push(result);
            Ok(())
        })
    }
}
