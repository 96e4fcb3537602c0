use serde::{Deserialize, Serialize};

/// Threshold multipliers for one location.
///
/// Urban heat lowers the heat a tree needs from the regional series and
/// raises the chill it needs; elevation does the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationModifiers {
    pub urban_gdd_mod: f64,
    pub urban_chill_mod: f64,
    pub elevation_gdd_mod: f64,
    pub elevation_chill_mod: f64,
}

/// Which accumulated quantity a threshold is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Gdd,
    Chill,
    DayLength,
    DayOfYear,
}

impl Default for LocationModifiers {
    fn default() -> Self {
        adjust_thresholds(false, 0.0)
    }
}

/// Compute the modifiers for a location's urban flag and elevation in meters.
pub fn adjust_thresholds(is_urban: bool, elevation_m: f64) -> LocationModifiers {
    let elevation_km = elevation_m / 1000.0;
    LocationModifiers {
        urban_gdd_mod: if is_urban { 0.9 } else { 1.0 },
        urban_chill_mod: if is_urban { 1.1 } else { 1.0 },
        elevation_gdd_mod: 1.0 + 0.15 * elevation_km,
        elevation_chill_mod: (1.0 - 0.15 * elevation_km).max(0.5),
    }
}

impl LocationModifiers {
    /// Scale `base` for this location. Day-length and calendar thresholds pass through.
    pub fn get_adjusted_threshold(&self, base: f64, metric: Metric) -> f64 {
        match metric {
            Metric::Gdd => base * self.urban_gdd_mod * self.elevation_gdd_mod,
            Metric::Chill => base * self.urban_chill_mod * self.elevation_chill_mod,
            Metric::DayLength | Metric::DayOfYear => base,
        }
    }

    pub fn gdd(&self, base: f64) -> f64 {
        self.get_adjusted_threshold(base, Metric::Gdd)
    }

    pub fn chill(&self, base: f64) -> f64 {
        self.get_adjusted_threshold(base, Metric::Chill)
    }
}
