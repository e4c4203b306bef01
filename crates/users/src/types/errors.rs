//! Error types for the user state.

use surplus_storage::StorageError;
use thiserror::Error;

/// User state errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User state is still loading")]
    StillLoading,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid stored data: {0}")]
    InvalidStoredData(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for user operations
pub type UserResult<T> = Result<T, UserError>;
