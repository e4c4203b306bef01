//! The read-only meal catalog.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::entities::Meal;
use crate::types::{CatalogError, CatalogResult};

const BUNDLED_MEALS: &str = include_str!("../data/meals.json");

/// Immutable, cheaply cloneable sequence of meals in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    meals: Arc<[Meal]>,
}

impl Catalog {
    /// Catalog over an explicit list of meals, taken as-is.
    pub fn new(meals: Vec<Meal>) -> Self {
        Self {
            meals: meals.into(),
        }
    }

    /// Catalog with no meals.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The mock catalog shipped with the client, with express deadlines
    /// counted from now.
    pub fn bundled() -> CatalogResult<Self> {
        Self::bundled_at(Utc::now())
    }

    /// The bundled catalog with express deadlines counted from `loaded_at`.
    pub fn bundled_at(loaded_at: DateTime<Utc>) -> CatalogResult<Self> {
        let catalog = Self::from_json_at(BUNDLED_MEALS, loaded_at)?;
        debug!(meals = catalog.len(), "loaded bundled catalog");
        Ok(catalog)
    }

    /// Parse a JSON array of meals.
    pub fn from_json_at(json: &str, loaded_at: DateTime<Utc>) -> CatalogResult<Self> {
        let mut meals: Vec<Meal> = serde_json::from_str(json)?;
        for meal in &mut meals {
            meal.resolve_express_deadline(loaded_at)?;
        }
        Ok(Self::new(meals))
    }

    /// Load a replacement catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_at(&json, Utc::now())?;
        info!(path = %path.display(), meals = catalog.len(), "loaded catalog file");
        Ok(catalog)
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Meal> {
        self.meals.iter()
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    /// Look a meal up by id.
    pub fn find(&self, id: &str) -> CatalogResult<&Meal> {
        self.meals
            .iter()
            .find(|meal| meal.id == id)
            .ok_or_else(|| CatalogError::MealNotFound(id.to_string()))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Meal;
    type IntoIter = std::slice::Iter<'a, Meal>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_bundled_catalog_parses() {
        let loaded_at = Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap();
        let catalog = Catalog::bundled_at(loaded_at).unwrap();

        assert_eq!(catalog.len(), 10);
        for meal in catalog.iter().filter(|meal| meal.is_express) {
            let deadline = meal.express_expires_at.expect("express meals carry a deadline");
            assert!(deadline > loaded_at);
            assert!(deadline <= loaded_at + Duration::hours(1));
        }
        assert!(catalog
            .iter()
            .filter(|meal| !meal.is_express)
            .all(|meal| meal.express_expires_at.is_none()));
    }

    #[test]
    fn test_bundled_prices_are_sane() {
        let catalog = Catalog::bundled().unwrap();
        for meal in &catalog {
            assert!(meal.discounted_price >= 0.0, "meal {}", meal.id);
            assert!(meal.discounted_price <= meal.original_price, "meal {}", meal.id);
            assert!(meal.carbon_saved >= 0.0, "meal {}", meal.id);
        }
    }

    #[test]
    fn test_find_unknown_meal() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.find("3").unwrap().name, "Caril de Grão");
        assert!(matches!(
            catalog.find("missing"),
            Err(CatalogError::MealNotFound(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_huge_express_window_is_rejected() {
        let json = Catalog::bundled()
            .map(|catalog| serde_json::to_value(catalog.meals()).unwrap())
            .unwrap();
        let mut meals = json.as_array().unwrap().clone();
        meals[0]["expressWindowMinutes"] = serde_json::json!(i64::MAX);
        meals[0].as_object_mut().unwrap().remove("expressExpiresAt");
        let broken = serde_json::Value::Array(meals).to_string();

        let result = Catalog::from_json_at(&broken, Utc::now());
        assert!(matches!(
            result,
            Err(CatalogError::InvalidExpressWindow { id }) if id == "1"
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.find("1").is_err());
    }

    #[test]
    fn test_from_path_reports_missing_file() {
        let err = Catalog::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
