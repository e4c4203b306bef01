//! JSON-file backed store, one file per key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use crate::errors::{StorageError, StorageResult};
use crate::key::StorageKey;
use crate::store::KeyValueStore;

/// Store that keeps each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn load(&self, key: StorageKey) -> StorageResult<Option<Value>> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { key, source }),
        };

        let value = serde_json::from_str(&contents)
            .map_err(|source| StorageError::Serialization { key, source })?;
        debug!(%key, path = %path.display(), "loaded stored value");
        Ok(Some(value))
    }

    async fn save(&self, key: StorageKey, value: Value) -> StorageResult<()> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(&value)
            .map_err(|source| StorageError::Serialization { key, source })?;

        // Rename keeps readers from ever seeing a half-written document.
        fs::write(&staging, bytes)
            .await
            .map_err(|source| StorageError::Io { key, source })?;
        fs::rename(&staging, &path)
            .await
            .map_err(|source| StorageError::Io { key, source })?;

        debug!(%key, path = %path.display(), "saved value");
        Ok(())
    }
}
