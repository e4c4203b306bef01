//! Error types for catalog access.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Meal not found: {0}")]
    MealNotFound(String),

    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Express window of meal {id} is out of range")]
    InvalidExpressWindow { id: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
