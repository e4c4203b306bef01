use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StorageResult;
use crate::key::StorageKey;

/// Asynchronous key-value store holding whole JSON documents.
///
/// `load` returns `Ok(None)` for a key that was never written. `save`
/// replaces the document under the key; there is no merge.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn load(&self, key: StorageKey) -> StorageResult<Option<Value>>;

    async fn save(&self, key: StorageKey, value: Value) -> StorageResult<()>;
}

