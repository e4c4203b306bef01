//! Search and dietary filtering.

use crate::entities::{DietaryPreference, Meal};

/// True when `query` is empty or appears, ignoring case, in the meal name or
/// the restaurant name.
pub fn matches_search(meal: &Meal, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    meal.name.to_lowercase().contains(&needle)
        || meal.restaurant.name.to_lowercase().contains(&needle)
}

/// True when no preference is selected or the meal carries any of them.
pub fn matches_dietary(meal: &Meal, preferences: &[DietaryPreference]) -> bool {
    preferences.is_empty() || preferences.iter().any(|pref| meal.has_tag(*pref))
}

/// Meals passing both the search and the dietary filter, in catalog order.
pub fn filter_meals<'a, I>(meals: I, query: &str, preferences: &[DietaryPreference]) -> Vec<&'a Meal>
where
    I: IntoIterator<Item = &'a Meal>,
{
    meals
        .into_iter()
        .filter(|meal| matches_search(meal, query) && matches_dietary(meal, preferences))
        .collect()
}
