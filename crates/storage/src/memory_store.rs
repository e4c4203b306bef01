//! In-memory store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::{StorageError, StorageResult};
use crate::key::StorageKey;
use crate::store::KeyValueStore;

/// Map-backed store. Clones share the same contents, so a test can keep a
/// handle while the store is owned elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<StorageKey, Value>>>,
    save_log: Arc<RwLock<Vec<(StorageKey, Value)>>>,
    fail_loads: Arc<AtomicBool>,
    fail_saves: Arc<AtomicBool>,
    load_delay: Option<Duration>,
    save_delay: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with raw values, as if written by an earlier run.
    pub fn with_values(values: impl IntoIterator<Item = (StorageKey, Value)>) -> Self {
        Self {
            values: Arc::new(RwLock::new(values.into_iter().collect())),
            ..Self::default()
        }
    }

    /// Delay every load, to hold a context in its loading state.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Delay every save, to leave writes in flight.
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Current raw value under `key`.
    pub async fn get(&self, key: StorageKey) -> Option<Value> {
        self.values.read().await.get(&key).cloned()
    }

    /// Every successful save for `key`, oldest first.
    pub async fn saves_for(&self, key: StorageKey) -> Vec<Value> {
        self.save_log
            .read()
            .await
            .iter()
            .filter(|(logged, _)| *logged == key)
            .map(|(_, value)| value.clone())
            .collect()
    }

    pub async fn save_count(&self) -> usize {
        self.save_log.read().await.len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn load(&self, key: StorageKey) -> StorageResult<Option<Value>> {
        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("load of {key} refused")));
        }
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn save(&self, key: StorageKey, value: Value) -> StorageResult<()> {
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable(format!("save of {key} refused")));
        }
        self.values.write().await.insert(key, value.clone());
        self.save_log.write().await.push((key, value));
        Ok(())
    }
}
