use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dietary tags a meal can carry and a user can filter by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryPreference {
    Vegetarian,
    Vegan,
    GlutenFree,
    LactoseFree,
    Halal,
    Kosher,
}

impl DietaryPreference {
    pub const ALL: [DietaryPreference; 6] = [
        DietaryPreference::Vegetarian,
        DietaryPreference::Vegan,
        DietaryPreference::GlutenFree,
        DietaryPreference::LactoseFree,
        DietaryPreference::Halal,
        DietaryPreference::Kosher,
    ];

    /// Wire name, as stored and as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::GlutenFree => "gluten-free",
            DietaryPreference::LactoseFree => "lactose-free",
            DietaryPreference::Halal => "halal",
            DietaryPreference::Kosher => "kosher",
        }
    }

    /// Display label shown next to a meal.
    pub fn label(self) -> &'static str {
        match self {
            DietaryPreference::Vegetarian => "Vegetariano",
            DietaryPreference::Vegan => "Vegan",
            DietaryPreference::GlutenFree => "Sem Glúten",
            DietaryPreference::LactoseFree => "Sem Lactose",
            DietaryPreference::Halal => "Halal",
            DietaryPreference::Kosher => "Kosher",
        }
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a tag outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dietary preference: {0}")]
pub struct UnknownDietaryPreference(pub String);

impl FromStr for DietaryPreference {
    type Err = UnknownDietaryPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        DietaryPreference::ALL
            .into_iter()
            .find(|pref| pref.as_str() == normalized)
            .ok_or_else(|| UnknownDietaryPreference(s.to_string()))
    }
}
