//! Error types for the storage layer

use thiserror::Error;

use crate::key::StorageKey;

/// Storage error
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error for {key}: {source}")]
    Io {
        key: StorageKey,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error for {key}: {source}")]
    Serialization {
        key: StorageKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported schema version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("Malformed stored value: {0}")]
    Malformed(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
