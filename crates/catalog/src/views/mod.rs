//! Derived views over the catalog.
//!
//! Everything here is a pure function of its inputs: the catalog, the
//! user's dietary selection, a search query, or a clock reading.

pub mod countdown;
pub mod feed;
pub mod filters;
pub mod impact;

pub use countdown::{countdown_label, Countdown, EXPIRED_LABEL};
pub use feed::{home_feed, partition_express, HomeFeed, DEFAULT_REGULAR_LIMIT};
pub use filters::{filter_meals, matches_dietary, matches_search};
pub use impact::{distance_equivalent_km, CAR_KM_PER_KG_CO2};
