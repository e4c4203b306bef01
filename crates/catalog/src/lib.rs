//! # Surplus Catalog Crate
//!
//! The meal catalog bundled with the client and the pure views computed
//! from it: search, dietary filtering, the home feed, impact equivalences,
//! and express countdowns.
//!
//! ## Usage
//!
//! ```rust
//! use surplus_catalog::{filter_meals, Catalog, DietaryPreference};
//!
//! let catalog = Catalog::bundled()?;
//! let vegan = filter_meals(&catalog, "", &[DietaryPreference::Vegan]);
//! assert!(!vegan.is_empty());
//! # Ok::<(), surplus_catalog::CatalogError>(())
//! ```

pub mod catalog;
pub mod entities;
pub mod types;
pub mod views;

pub use catalog::Catalog;
pub use entities::{
    Coordinates, DietaryPreference, Meal, MealType, PickupWindow, Restaurant, RestaurantKind,
    UnknownDietaryPreference,
};
pub use types::{CatalogError, CatalogResult};
pub use views::{
    countdown_label, distance_equivalent_km, filter_meals, home_feed, matches_dietary,
    matches_search, partition_express, Countdown, HomeFeed, CAR_KM_PER_KG_CO2,
    DEFAULT_REGULAR_LIMIT, EXPIRED_LABEL,
};
