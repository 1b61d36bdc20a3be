//! Completion ledger: which contests this device has already finished.
//!
//! The ledger is scoped to the device, not the account. Switching accounts
//! on the same device inherits the same ledger; that mismatch is a known
//! limitation of the original design and is preserved here.

use std::sync::Arc;

use indexmap::IndexSet;
use tokio::sync::Mutex;
use tracing::debug;

use crate::store::{StateStore, StoreResult};

/// Durable set of completed contest ids with write-through persistence.
#[derive(Clone)]
pub struct CompletionLedger {
    store: Arc<dyn StateStore>,
    completed: Arc<Mutex<IndexSet<String>>>,
}

impl CompletionLedger {
    /// Hydrate the ledger from the store.
    pub async fn load(store: Arc<dyn StateStore>) -> StoreResult<Self> {
        let completed: IndexSet<String> = store.load_completed().await?.into_iter().collect();
        Ok(CompletionLedger {
            store,
            completed: Arc::new(Mutex::new(completed)),
        })
    }

    /// Whether this device has already finished the contest.
    pub async fn is_complete(&self, contest_id: &str) -> bool {
        self.completed.lock().await.contains(contest_id)
    }

    /// Record the contest as finished. Idempotent: marking an already-present
    /// id changes nothing and skips the write.
    pub async fn mark_complete(&self, contest_id: &str) -> StoreResult<()> {
        let snapshot = {
            let mut completed = self.completed.lock().await;
            if !completed.insert(contest_id.to_string()) {
                return Ok(());
            }
            completed.iter().cloned().collect::<Vec<_>>()
        };

        debug!(contest_id, "marking contest complete");
        self.store.save_completed(snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn mark_complete_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let ledger = CompletionLedger::load(store.clone()).await.unwrap();

        assert!(!ledger.is_complete("c1").await);
        ledger.mark_complete("c1").await.unwrap();
        ledger.mark_complete("c1").await.unwrap();
        assert!(ledger.is_complete("c1").await);

        assert_eq!(store.load_completed().await.unwrap(), vec!["c1"]);
    }

    #[tokio::test]
    async fn ledger_survives_rehydration() {
        let store = Arc::new(MemoryStore::new());
        {
            let ledger = CompletionLedger::load(store.clone()).await.unwrap();
            ledger.mark_complete("c1").await.unwrap();
            ledger.mark_complete("c2").await.unwrap();
        }

        let reloaded = CompletionLedger::load(store).await.unwrap();
        assert!(reloaded.is_complete("c1").await);
        assert!(reloaded.is_complete("c2").await);
        assert!(!reloaded.is_complete("c3").await);
    }
}
