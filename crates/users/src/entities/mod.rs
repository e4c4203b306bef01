//! Domain entities for the user state.
//!
//! The two aggregates persisted per installation, plus the dashboard view
//! derived from impact counters.

pub mod impact;
pub mod preferences;

pub use impact::{ImpactStats, ImpactSummary};
pub use preferences::{UserPreferences, DEFAULT_MAX_DISTANCE_KM, DEFAULT_USER_NAME};
