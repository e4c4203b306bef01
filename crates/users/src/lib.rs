//! # Surplus Users Crate
//!
//! Live user state for the surplus meals client: dietary preferences,
//! favorites and profile details, plus cumulative impact counters. Both
//! aggregates are loaded from a [`KeyValueStore`](surplus_storage::KeyValueStore)
//! at startup and written back whole after every change.
//!
//! ## Architecture
//!
//! - **Entities**: `UserPreferences`, `ImpactStats`, `ImpactSummary`
//! - **Services**: `UserContext` and the per-key save queues
//! - **Repositories**: versioned (de)serialization of aggregates
//! - **Types**: errors and the presentation snapshot
//! - **Utils**: input validation for profile edits
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> surplus_users::UserResult<()> {
//! use std::sync::Arc;
//! use surplus_catalog::DietaryPreference;
//! use surplus_storage::MemoryStore;
//! use surplus_users::UserContext;
//!
//! let context = UserContext::hydrate(Arc::new(MemoryStore::new())).await;
//! context.toggle_dietary_preference(DietaryPreference::Vegan)?;
//! context.flush().await;
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod repositories;
pub mod services;
pub mod types;
pub mod utils;

pub use entities::{ImpactStats, ImpactSummary, UserPreferences};
pub use repositories::{Aggregate, AggregateRepository};
pub use services::{PersistenceQueue, UserContext};
pub use types::{UserError, UserResult, UserSnapshot};
