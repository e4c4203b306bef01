use serde::{Deserialize, Serialize};
use surplus_catalog::DietaryPreference;

/// Display name used until the user picks one.
pub const DEFAULT_USER_NAME: &str = "Utilizador";

/// Default search radius in kilometers.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 5.0;

/// User preferences, one per installation.
///
/// Fields missing from a stored document fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Selected dietary tags, unique, in the order they were selected.
    pub dietary_preferences: Vec<DietaryPreference>,
    /// Search radius in kilometers. Stored but not used by any filter yet.
    pub max_distance: f64,
    /// Favorite restaurant ids, unique, in the order they were added.
    pub favorite_restaurants: Vec<String>,
    pub user_name: String,
    /// Local image reference; `None` means the default avatar.
    pub profile_photo_uri: Option<String>,
    pub user_email: Option<String>,
    pub user_address: Option<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            dietary_preferences: Vec::new(),
            max_distance: DEFAULT_MAX_DISTANCE_KM,
            favorite_restaurants: Vec::new(),
            user_name: DEFAULT_USER_NAME.to_string(),
            profile_photo_uri: None,
            user_email: None,
            user_address: None,
        }
    }
}

impl UserPreferences {
    /// Add `tag` if absent, remove it if present.
    pub fn toggle_dietary_preference(&mut self, tag: DietaryPreference) {
        toggle(&mut self.dietary_preferences, tag);
    }

    /// Add `restaurant_id` to favorites if absent, remove it if present.
    pub fn toggle_favorite_restaurant(&mut self, restaurant_id: &str) {
        toggle(&mut self.favorite_restaurants, restaurant_id.to_string());
    }

    pub fn has_dietary_preference(&self, tag: DietaryPreference) -> bool {
        self.dietary_preferences.contains(&tag)
    }

    pub fn is_favorite(&self, restaurant_id: &str) -> bool {
        self.favorite_restaurants.iter().any(|id| id == restaurant_id)
    }

    /// Email, treating an empty string as not provided.
    pub fn email(&self) -> Option<&str> {
        non_empty(self.user_email.as_deref())
    }

    /// Address, treating an empty string as not provided.
    pub fn address(&self) -> Option<&str> {
        non_empty(self.user_address.as_deref())
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(position) = items.iter().position(|existing| *existing == item) {
        items.remove(position);
    } else {
        items.push(item);
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
