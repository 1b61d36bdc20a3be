//! Append-only local history of finished practice tests.

use std::sync::Arc;

use tracing::debug;

use crate::{
    dto::practice::PracticeResult,
    store::{StateStore, StoreResult},
};

/// Handle to the practice result history.
#[derive(Clone)]
pub struct PracticeLog {
    store: Arc<dyn StateStore>,
}

impl PracticeLog {
    /// Create a log backed by the given store.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        PracticeLog { store }
    }

    /// Past results, oldest first.
    pub async fn history(&self) -> StoreResult<Vec<PracticeResult>> {
        self.store.load_practice_results().await
    }

    /// Append a finished test result.
    pub async fn record(&self, result: PracticeResult) -> StoreResult<()> {
        debug!(
            course = %result.course_code,
            score = result.score,
            "recording practice result"
        );
        self.store.append_practice_result(result).await
    }
}
