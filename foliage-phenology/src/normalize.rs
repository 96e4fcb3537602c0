//! Turns a raw daily weather series into the derived variables the species
//! models read: photoperiod, heat and chill accumulations, season flags and
//! rolling stress indicators.

use crate::error::{PhenologyError, Result};
use crate::solar::day_length_hours;
use crate::thresholds::adjust_thresholds;
use chrono::{Datelike, NaiveDate};
use foliage_weather::{Site, WeatherSeries};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Constants used by [`normalize`].
///
/// Urban cells divide their accumulated chill by the location's
/// `urban_chill_mod` (1.1), so a city tree banks less chill than its rural
/// neighbour on the same weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Base temperature for growing degree days, °C
    pub gdd_base_temp: f64,
    /// Maximum temperature below which a fall day accumulates chill, °C
    pub chill_base_temp: f64,
    /// Minimum temperature below which a day counts as a freeze, °C
    pub freeze_temp: f64,
    /// Trailing window for freeze and soil moisture indicators, days
    pub stress_window_days: usize,
    /// Rolling soil moisture at which drought stress begins, m³/m³
    pub drought_moisture: f64,
    /// Rolling soil moisture below which drought is severe, m³/m³
    pub severe_drought_moisture: f64,
    /// First day shorter than this starts the fall season, hours
    pub fall_day_length_hours: f64,
    /// Day of year after which fall starts when no photoperiod is available
    pub fall_doy_cutoff: u32,
    /// Day length recorded when sunrise cannot be computed, hours
    pub fallback_day_length_hours: f64,
    /// Elevation at which the UV stress factor saturates, m
    pub uv_saturation_elevation_m: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        NormalizerConfig {
            gdd_base_temp: 10.0,
            chill_base_temp: 15.0,
            freeze_temp: -3.0,
            stress_window_days: 14,
            drought_moisture: 0.15,
            severe_drought_moisture: 0.08,
            fall_day_length_hours: 12.0,
            fall_doy_cutoff: 200,
            fallback_day_length_hours: 12.0,
            uv_saturation_elevation_m: 1000.0,
        }
    }
}

impl NormalizerConfig {
    /// Parse a JSON document; missing keys keep their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NormalizerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            PhenologyError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stress_window_days == 0 {
            return Err(PhenologyError::InvalidConfig(
                "stress_window_days must be at least 1".to_string(),
            ));
        }
        if !(self.drought_moisture > 0.0) {
            return Err(PhenologyError::InvalidConfig(
                "drought_moisture must be positive".to_string(),
            ));
        }
        if !(self.uv_saturation_elevation_m > 0.0) {
            return Err(PhenologyError::InvalidConfig(
                "uv_saturation_elevation_m must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// One day of weather extended with everything the species models read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedDailyVariables {
    pub date: NaiveDate,
    pub day_of_year: u32,
    pub day_length_hours: f64,
    /// False when sunrise could not be computed and the fallback was used
    pub photoperiod_live: bool,
    pub max_temp: f64,
    pub min_temp: f64,
    pub mean_temp: f64,
    pub daily_gdd: f64,
    pub accumulated_gdd: f64,
    pub is_fall_season: bool,
    pub daily_chill: f64,
    pub accumulated_chill: f64,
    pub is_freeze_day: bool,
    pub recent_freeze: bool,
    pub rolling_soil_moisture: f64,
    pub drought_stress: f64,
    pub severe_drought: bool,
    pub uv_stress_factor: f64,
}

/// Derived variables for one location, in date order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedSeries {
    pub rows: Vec<DerivedDailyVariables>,
}

impl DerivedSeries {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Calendar year of the first row.
    pub fn year(&self) -> Option<i32> {
        self.rows.first().map(|row| row.date.year())
    }
}

/// Derive the daily variables for `series` at `site`.
///
/// The output has the same length and order as the input; an empty series
/// yields an empty derived series.
pub fn normalize(series: &WeatherSeries, site: &Site, config: &NormalizerConfig) -> DerivedSeries {
    let records = series.records();
    if records.is_empty() {
        log::debug!(
            "[Foliage Debug] normalize: empty weather series for {}",
            site.location_id
        );
        return DerivedSeries::default();
    }

    let modifiers = adjust_thresholds(site.is_urban, site.elevation_m);
    let photoperiod: Vec<Option<f64>> = records
        .iter()
        .map(|r| day_length_hours(site.latitude, &r.date))
        .collect();
    let day_lengths: Vec<f64> = photoperiod
        .iter()
        .map(|p| p.unwrap_or(config.fallback_day_length_hours))
        .collect();
    let any_live = photoperiod.iter().any(Option::is_some);
    let dead_days = photoperiod.iter().filter(|p| p.is_none()).count();
    if dead_days > 0 {
        log::debug!(
            "[Foliage Debug] normalize: {} days without sunrise at lat {}, using {} h",
            dead_days,
            site.latitude,
            config.fallback_day_length_hours
        );
    }

    let fall_start = if any_live {
        fall_trigger_from_photoperiod(&photoperiod, config.fall_day_length_hours)
    } else {
        records
            .iter()
            .position(|r| r.date.ordinal() > config.fall_doy_cutoff)
    };

    let uv_stress_factor = (site.elevation_m / config.uv_saturation_elevation_m).clamp(0.0, 1.0);
    let window = config.stress_window_days;

    let mut rows = Vec::with_capacity(records.len());
    let mut accumulated_gdd = 0.0;
    let mut chill_sum = 0.0;
    let mut freeze_flags: Vec<bool> = Vec::with_capacity(records.len());
    let mut moisture_sum = 0.0;

    for (i, record) in records.iter().enumerate() {
        let is_fall_season = fall_start.is_some_and(|start| i >= start);

        let mean_temp = (record.max_temp + record.min_temp) / 2.0;
        let daily_gdd = (mean_temp - config.gdd_base_temp).max(0.0);
        accumulated_gdd += daily_gdd;

        let daily_chill = if is_fall_season {
            (config.chill_base_temp - record.max_temp).max(0.0)
        } else {
            0.0
        };
        chill_sum += daily_chill;

        let is_freeze_day = record.min_temp < config.freeze_temp;
        freeze_flags.push(is_freeze_day);
        let window_start = (i + 1).saturating_sub(window);
        let recent_freeze = freeze_flags[window_start..].iter().any(|f| *f);

        moisture_sum += record.soil_moisture;
        if i >= window {
            moisture_sum -= records[i - window].soil_moisture;
        }
        let window_len = (i + 1 - window_start) as f64;
        let rolling_soil_moisture = moisture_sum / window_len;
        let drought_stress = ((config.drought_moisture - rolling_soil_moisture)
            / config.drought_moisture)
            .clamp(0.0, 1.0);

        rows.push(DerivedDailyVariables {
            date: record.date,
            day_of_year: record.date.ordinal(),
            day_length_hours: day_lengths[i],
            photoperiod_live: photoperiod[i].is_some(),
            max_temp: record.max_temp,
            min_temp: record.min_temp,
            mean_temp,
            daily_gdd,
            accumulated_gdd,
            is_fall_season,
            daily_chill,
            accumulated_chill: chill_sum / modifiers.urban_chill_mod,
            is_freeze_day,
            recent_freeze,
            rolling_soil_moisture,
            drought_stress,
            severe_drought: rolling_soil_moisture < config.severe_drought_moisture,
            uv_stress_factor,
        });
    }

    log::debug!(
        "[Foliage Debug] normalize: {} rows for {}, fall starts at index {:?}",
        rows.len(),
        site.location_id,
        fall_start
    );
    DerivedSeries { rows }
}

/// First index whose live day length is below `threshold`.
///
/// Days where sunrise could not be computed never trigger fall.
fn fall_trigger_from_photoperiod(photoperiod: &[Option<f64>], threshold: f64) -> Option<usize> {
    photoperiod
        .iter()
        .position(|hours| hours.is_some_and(|dl| dl < threshold))
}
