use serde::{Deserialize, Serialize};
use surplus_catalog::distance_equivalent_km;

/// Cumulative impact counters, one per installation.
///
/// Every field only grows; there is no reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactStats {
    pub meals_saved: u32,
    /// Kilograms of CO2.
    pub co2_saved: f64,
    pub money_saved: f64,
    pub meals_donated: u32,
    /// Incremented on every saved meal; never decays.
    pub current_streak: u32,
}

impl ImpactStats {
    pub fn record_meal_saved(&mut self, carbon_saved: f64, money_saved: f64) {
        self.meals_saved = self.meals_saved.saturating_add(1);
        self.co2_saved += carbon_saved;
        self.money_saved += money_saved;
        self.current_streak = self.current_streak.saturating_add(1);
    }

    pub fn record_meal_donated(&mut self) {
        self.meals_donated = self.meals_donated.saturating_add(1);
    }
}

/// Figures shown on the impact dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactSummary {
    pub meals_saved: u32,
    pub co2_saved: f64,
    /// Car kilometers avoided.
    pub km_avoided: i64,
    pub money_saved: f64,
    pub meals_donated: u32,
    pub current_streak: u32,
}

impl ImpactSummary {
    /// Money saved rounded to whole currency units, e.g. `"13€"`.
    pub fn money_saved_label(&self) -> String {
        format!("{:.0}€", self.money_saved)
    }

    pub fn km_avoided_label(&self) -> String {
        format!("{} km de carro não percorridos", self.km_avoided)
    }
}

impl From<&ImpactStats> for ImpactSummary {
    fn from(stats: &ImpactStats) -> Self {
        Self {
            meals_saved: stats.meals_saved,
            co2_saved: stats.co2_saved,
            km_avoided: distance_equivalent_km(stats.co2_saved),
            money_saved: stats.money_saved,
            meals_donated: stats.meals_donated,
            current_streak: stats.current_streak,
        }
    }
}
