// SPDX-License-Identifier: MIT

//! Debounced, best-effort writes to a value store

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::flow::state::Values;
use crate::kit::store::ValueStore;

/// Wraps a [`ValueStore`] so that bursts of writes collapse into one.
///
/// A write waits for the debounce window; a newer write or a `clear()`
/// supersedes it. Writes and clears never overlap, so a cleared entry stays
/// cleared. Errors are logged and never returned.
pub struct DebouncedStore {
    inner: Arc<dyn ValueStore>,
    window: Duration,
    generation: Arc<AtomicU64>,
    io: Arc<tokio::sync::Mutex<()>>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedStore {
    pub fn new(inner: Arc<dyn ValueStore>, window: Duration) -> Self {
        Self {
            inner,
            window,
            generation: Arc::new(AtomicU64::new(0)),
            io: Arc::new(tokio::sync::Mutex::new(())),
            pending: Mutex::new(None),
        }
    }

    /// Read cached values; failures read as empty
    pub async fn load(&self, key: &str) -> Values {
        match self.inner.get(key).await {
            Ok(values) => values.unwrap_or_default(),
            Err(e) => {
                log::warn!("Failed to read cached values for {}: {}", key, e);
                Values::new()
            }
        }
    }

    /// Schedule a write, replacing any write still waiting
    pub fn schedule(&self, key: &str, values: Values) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = self.generation.clone();
        let io = self.io.clone();
        let inner = self.inner.clone();
        let window = self.window;
        let key = key.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // Detached so that aborting the wait never cuts a write in half
            let write = tokio::spawn(async move {
                let _io = io.lock().await;
                if current.load(Ordering::SeqCst) != generation {
                    return;
                }
                if let Err(e) = inner.set(&key, &values).await {
                    log::warn!("Failed to cache values for {}: {}", key, e);
                }
            });
            let _ = write.await;
        });
        self.replace_pending(Some(handle));
    }

    /// Cancel any waiting write, let one already running finish, then
    /// remove the cached entry
    pub async fn clear(&self, key: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.replace_pending(None);
        let _io = self.io.lock().await;
        if let Err(e) = self.inner.clear(key).await {
            log::warn!("Failed to clear cached values for {}: {}", key, e);
        }
    }

    fn replace_pending(&self, next: Option<JoinHandle<()>>) {
        match self.pending.lock() {
            Ok(mut pending) => {
                if let Some(previous) = std::mem::replace(&mut *pending, next) {
                    previous.abort();
                }
            }
            Err(e) => log::warn!("Debounce state unavailable: {}", e),
        }
    }
}

impl Drop for DebouncedStore {
    fn drop(&mut self) {
        self.replace_pending(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::store::MemoryValueStore;
    use crate::kit::error::{Result, StepflowError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct BrokenStore;

    #[async_trait]
    impl ValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<Values>> {
            Err(StepflowError::store("disk on fire"))
        }

        async fn set(&self, _key: &str, _values: &Values) -> Result<()> {
            Err(StepflowError::store("disk on fire"))
        }

        async fn clear(&self, _key: &str) -> Result<()> {
            Err(StepflowError::store("disk on fire"))
        }
    }

    /// Writes on the blocking pool, which an abort cannot interrupt
    #[derive(Default)]
    struct SlowStore {
        entries: Arc<Mutex<HashMap<String, Values>>>,
    }

    #[async_trait]
    impl ValueStore for SlowStore {
        async fn get(&self, key: &str) -> Result<Option<Values>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, values: &Values) -> Result<()> {
            let entries = self.entries.clone();
            let (key, values) = (key.to_string(), values.clone());
            tokio::task::spawn_blocking(move || {
                std::thread::sleep(Duration::from_millis(50));
                entries.lock().unwrap().insert(key, values);
            })
            .await
            .map_err(|e| StepflowError::store(e.to_string()))
        }

        async fn clear(&self, key: &str) -> Result<()> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn answer(v: &str) -> Values {
        Values::from([("q1".to_string(), json!(v))])
    }

    #[tokio::test]
    async fn test_writes_are_coalesced() {
        let memory = MemoryValueStore::new();
        let store = DebouncedStore::new(Arc::new(memory.clone()), Duration::from_millis(20));

        store.schedule("k", answer("first"));
        store.schedule("k", answer("second"));
        assert!(memory.get("k").await.unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(memory.get("k").await.unwrap(), Some(answer("second")));
    }

    #[tokio::test]
    async fn test_clear_cancels_pending_write() {
        let memory = MemoryValueStore::new();
        let store = DebouncedStore::new(Arc::new(memory.clone()), Duration::from_millis(20));

        store.schedule("k", answer("late"));
        store.clear("k").await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(memory.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let store = DebouncedStore::new(Arc::new(BrokenStore), Duration::from_millis(1));
        assert!(store.load("k").await.is_empty());
        store.schedule("k", answer("x"));
        store.clear("k").await;
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_clear_waits_for_running_write() {
        let slow = Arc::new(SlowStore::default());
        let store = DebouncedStore::new(slow.clone(), Duration::from_millis(1));

        store.schedule("k", answer("stale"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.clear("k").await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(slow.get("k").await.unwrap().is_none());
    }
}
