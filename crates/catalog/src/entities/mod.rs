//! Catalog entities.
//!
//! Meals are immutable once loaded; nothing in the client writes to them.

pub mod dietary;
pub mod meal;

pub use dietary::{DietaryPreference, UnknownDietaryPreference};
pub use meal::{Coordinates, Meal, MealType, PickupWindow, Restaurant, RestaurantKind};
