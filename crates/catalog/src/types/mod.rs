pub mod errors;

pub use errors::{CatalogError, CatalogResult};
