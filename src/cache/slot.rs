use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::helpers::time::now_i64;

/// Cached state for one category.
///
/// Invariant: `text` is either empty (never fetched) or a syntactically
/// complete block of exposition lines committed as a unit.
#[derive(Debug, Clone, Default)]
pub struct SlotState {
    pub text: String,
    /// UNIX timestamp (seconds) of the last successful commit.
    pub fetched_at: Option<i64>,
}

/// One cache slot: readable state plus a refresh lock.
///
/// The lock serializes refreshes of the same category so two concurrent
/// fetches can never commit interleaved data; readers are never blocked by
/// an in-flight refresh.
#[derive(Debug, Default)]
pub struct Slot {
    state: RwLock<SlotState>,
    refresh: Mutex<()>,
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> SlotState {
        self.state.read().await.clone()
    }

    pub async fn is_fresh(&self, ttl: Duration) -> bool {
        let now = now_i64();
        self.state
            .read()
            .await
            .fetched_at
            .map(|at| now - at < ttl.as_secs() as i64)
            .unwrap_or(false)
    }

    /// Atomically replace the slot content. Only called after both fetch
    /// and render succeeded.
    pub async fn commit(&self, text: String) {
        let mut state = self.state.write().await;
        state.text = text;
        state.fetched_at = Some(now_i64());
    }

    /// Held for the duration of one fetch-render-commit sequence.
    pub async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh.lock().await
    }
}
