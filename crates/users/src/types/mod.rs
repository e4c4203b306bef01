//! Shared types for the user state.

pub mod errors;

pub use errors::{UserError, UserResult};

use crate::entities::{ImpactStats, UserPreferences};

/// Everything the presentation layer reads from the context at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSnapshot {
    pub preferences: UserPreferences,
    pub impact: ImpactStats,
    pub is_loading: bool,
}
