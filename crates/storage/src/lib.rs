//! Surplus Storage Crate
//!
//! Local persistence for the two user aggregates. Every value is a whole
//! JSON document stored under one of a fixed set of keys; there are no
//! partial writes and no transactions spanning keys.

use std::sync::Arc;

use anyhow::{Context, Result};
use surplus_config::{StorageBackend, StorageConfig};
use tracing::info;

pub mod errors;
pub mod file_store;
pub mod key;
pub mod memory_store;
pub mod migrations;
pub mod store;

pub use errors::{StorageError, StorageResult};
pub use file_store::FileStore;
pub use key::StorageKey;
pub use memory_store::MemoryStore;
pub use migrations::{seal, upgrade, CURRENT_SCHEMA_VERSION};
pub use store::KeyValueStore;

/// Open the store selected by configuration.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::File => {
            let store = FileStore::open(&config.data_dir).await.with_context(|| {
                format!("failed to open data directory {}", config.data_dir.display())
            })?;
            info!(dir = %config.data_dir.display(), "file store ready");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            info!("memory store ready, nothing will persist across restarts");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
