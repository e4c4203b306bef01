use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::dietary::DietaryPreference;
use crate::types::{CatalogError, CatalogResult};

/// Where a restaurant sits on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Kind of establishment offering the meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestaurantKind {
    School,
    Restaurant,
    Institution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RestaurantKind,
    pub address: String,
    /// Distance from the user in kilometers.
    pub distance: f64,
    pub coordinates: Coordinates,
}

/// Pickup window as time-of-day strings (`"21:00"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupWindow {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// A surplus meal offered at a discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub restaurant: Restaurant,
    pub original_price: f64,
    pub discounted_price: f64,
    pub available_quantity: u32,
    pub pickup_time: PickupWindow,
    #[serde(default)]
    pub dietary_info: Vec<DietaryPreference>,
    pub meal_type: MealType,
    #[serde(default)]
    pub is_express: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub express_expires_at: Option<DateTime<Utc>>,
    /// Express window relative to catalog load time, for bundled data that
    /// cannot carry absolute deadlines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub express_window_minutes: Option<i64>,
    /// Kilograms of CO2 attributed to saving this meal.
    pub carbon_saved: f64,
}

impl Meal {
    /// Amount the user saves by reserving instead of paying full price.
    pub fn savings(&self) -> f64 {
        self.original_price - self.discounted_price
    }

    /// Whole-number discount percentage, 0 when the original price is 0.
    pub fn discount_percent(&self) -> u32 {
        if self.original_price <= 0.0 {
            return 0;
        }
        let ratio = self.savings() / self.original_price * 100.0;
        ratio.round().clamp(0.0, 100.0) as u32
    }

    pub fn has_tag(&self, tag: DietaryPreference) -> bool {
        self.dietary_info.contains(&tag)
    }

    /// Turn a relative express window into an absolute deadline.
    pub(crate) fn resolve_express_deadline(&mut self, loaded_at: DateTime<Utc>) -> CatalogResult<()> {
        if self.express_expires_at.is_some() {
            return Ok(());
        }
        if let Some(minutes) = self.express_window_minutes {
            let deadline = Duration::try_minutes(minutes)
                .and_then(|window| loaded_at.checked_add_signed(window))
                .ok_or_else(|| CatalogError::InvalidExpressWindow {
                    id: self.id.clone(),
                })?;
            self.express_expires_at = Some(deadline);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_meal() -> Meal {
        Meal {
            id: "m1".to_string(),
            name: "Sushi Set".to_string(),
            description: "".to_string(),
            image_url: "".to_string(),
            restaurant: Restaurant {
                id: "r1".to_string(),
                name: "Sushi House".to_string(),
                kind: RestaurantKind::Restaurant,
                address: "Rua 1".to_string(),
                distance: 1.0,
                coordinates: Coordinates {
                    latitude: 38.7,
                    longitude: -9.1,
                },
            },
            original_price: 10.0,
            discounted_price: 4.0,
            available_quantity: 1,
            pickup_time: PickupWindow {
                start: "20:00".to_string(),
                end: "21:00".to_string(),
            },
            dietary_info: vec![DietaryPreference::Vegan],
            meal_type: MealType::Dinner,
            is_express: true,
            express_expires_at: None,
            express_window_minutes: Some(15),
            carbon_saved: 1.2,
        }
    }

    #[test]
    fn test_savings_and_discount() {
        let meal = sample_meal();
        assert!((meal.savings() - 6.0).abs() < f64::EPSILON);
        assert_eq!(meal.discount_percent(), 60);

        let free = Meal {
            original_price: 0.0,
            discounted_price: 0.0,
            ..sample_meal()
        };
        assert_eq!(free.discount_percent(), 0);
    }

    #[test]
    fn test_relative_window_resolves_once() {
        let loaded_at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut meal = sample_meal();

        meal.resolve_express_deadline(loaded_at).unwrap();
        assert_eq!(
            meal.express_expires_at,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 12, 15, 0).unwrap())
        );

        meal.resolve_express_deadline(loaded_at + Duration::hours(1)).unwrap();
        assert_eq!(
            meal.express_expires_at,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 12, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_out_of_range_window_is_an_error() {
        let loaded_at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut meal = Meal {
            express_expires_at: None,
            express_window_minutes: Some(i64::MAX),
            ..sample_meal()
        };

        let err = meal.resolve_express_deadline(loaded_at).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidExpressWindow { id } if id == "m1"));
        assert!(meal.express_expires_at.is_none());
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let value = serde_json::to_value(sample_meal()).unwrap();
        assert_eq!(value["restaurant"]["type"], "restaurant");
        assert_eq!(value["originalPrice"], 10.0);
        assert_eq!(value["dietaryInfo"][0], "vegan");
        assert!(value.get("expressExpiresAt").is_none());
    }
}
