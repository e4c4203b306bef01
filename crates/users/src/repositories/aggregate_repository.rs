use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use surplus_storage::{seal, upgrade, KeyValueStore, StorageError, StorageKey};
use tracing::debug;

use crate::entities::{ImpactStats, UserPreferences};
use crate::types::{UserError, UserResult};

/// A whole document persisted under one storage key.
pub trait Aggregate: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    const KEY: StorageKey;
}

impl Aggregate for UserPreferences {
    const KEY: StorageKey = StorageKey::Preferences;
}

impl Aggregate for ImpactStats {
    const KEY: StorageKey = StorageKey::Impact;
}

/// Reads and writes aggregates through a [`KeyValueStore`].
#[derive(Clone)]
pub struct AggregateRepository {
    store: Arc<dyn KeyValueStore>,
}

impl AggregateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the stored aggregate, upgrading older schema versions.
    ///
    /// Returns `Ok(None)` when nothing was ever written under the key.
    pub async fn load<T: Aggregate>(&self) -> UserResult<Option<T>> {
        let Some(stored) = self.store.load(T::KEY).await? else {
            debug!(key = %T::KEY, "no stored value");
            return Ok(None);
        };

        let data = upgrade(stored)?;
        let aggregate = serde_json::from_value(data)
            .map_err(|e| UserError::InvalidStoredData(format!("{}: {e}", T::KEY)))?;
        Ok(Some(aggregate))
    }

    /// Write the whole aggregate, replacing what was stored.
    pub async fn save<T: Aggregate>(&self, aggregate: &T) -> UserResult<()> {
        let document = Self::encode(aggregate)?;
        self.store.save(T::KEY, document).await?;
        Ok(())
    }

    /// Serialize an aggregate into its versioned storage document.
    pub fn encode<T: Aggregate>(aggregate: &T) -> UserResult<Value> {
        let data = serde_json::to_value(aggregate).map_err(|source| StorageError::Serialization {
            key: T::KEY,
            source,
        })?;
        Ok(seal(data))
    }
}
