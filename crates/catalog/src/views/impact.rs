//! Impact equivalences.

/// Kilometers of car travel treated as equivalent to one kilogram of CO2.
pub const CAR_KM_PER_KG_CO2: f64 = 20.0;

/// Car kilometers avoided for `co2_saved` kilograms, rounded to the nearest
/// kilometer.
pub fn distance_equivalent_km(co2_saved: f64) -> i64 {
    (co2_saved * CAR_KM_PER_KG_CO2).round() as i64
}
