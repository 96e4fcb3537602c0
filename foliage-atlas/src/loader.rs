//! CSV loading for grid cells and daily weather.
//!
//! # CSV Formats
//!
//! - **Grid cells** (has headers): `location_id,latitude,longitude,elevation_m,is_urban`
//! - **Weather** (has headers): `location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture`
//!
//! Malformed rows are logged, counted and skipped; they never reach the
//! tables the normalizer reads from.

use crate::models::LoadReport;
use crate::Database;
use foliage_utils::dates::format_date;
use foliage_weather::{Site, WeatherObservation};
use rusqlite::params;

/// Rejected rows logged individually before the loader only counts them.
const MAX_LOGGED_REJECTIONS: usize = 10;

impl Database {
    /// Load grid cells from a CSV string, replacing cells with the same id.
    ///
    /// # Example CSV
    /// ```text
    /// location_id,latitude,longitude,elevation_m,is_urban
    /// SEA-01,47.6062,-122.3321,56,true
    /// ```
    pub fn load_grid_cells(&self, csv_data: &str) -> anyhow::Result<LoadReport> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut report = LoadReport::default();
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for result in rdr.records() {
            let site = match Site::try_from(result?) {
                Ok(site) => site,
                Err(e) => {
                    if report.skipped < MAX_LOGGED_REJECTIONS {
                        log::warn!("[Foliage Debug] loader: skipping grid cell row: {}", e);
                    }
                    report.skipped += 1;
                    continue;
                }
            };
            tx.execute(
                "INSERT OR REPLACE INTO grid_cells (location_id, latitude, longitude, elevation_m, is_urban)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    site.location_id,
                    site.latitude,
                    site.longitude,
                    site.elevation_m,
                    site.is_urban
                ],
            )?;
            report.inserted += 1;
        }
        tx.commit()?;
        log::info!(
            "[Foliage Debug] loader: Loaded {} grid cells, skipped {} malformed",
            report.inserted,
            report.skipped
        );
        Ok(report)
    }

    /// Load daily weather from a CSV string, replacing rows with the same
    /// location and date.
    ///
    /// # Example CSV
    /// ```text
    /// location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture
    /// SEA-01,2024-01-01,8.1,2.3,7200,4.2,0.34
    /// ```
    pub fn load_weather(&self, csv_data: &str) -> anyhow::Result<LoadReport> {
        let (observations, rejected) = WeatherObservation::parse_weather_csv_lenient(csv_data)?;
        for e in rejected.iter().take(MAX_LOGGED_REJECTIONS) {
            log::warn!("[Foliage Debug] loader: skipping weather row: {}", e);
        }

        let report = LoadReport {
            inserted: observations.len(),
            skipped: rejected.len(),
        };
        let by_location = WeatherObservation::vector_to_hashmap(observations);

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO weather_observations
                 (location_id, date, max_temp, min_temp, sunshine_duration, precipitation, soil_moisture)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (location_id, records) in &by_location {
                for r in records {
                    stmt.execute(params![
                        location_id,
                        format_date(&r.date),
                        r.max_temp,
                        r.min_temp,
                        r.sunshine_duration,
                        r.precipitation,
                        r.soil_moisture
                    ])?;
                }
                log::debug!(
                    "[Foliage Debug] loader: {} weather rows for {}",
                    records.len(),
                    location_id
                );
            }
        }
        tx.commit()?;

        log::info!(
            "[Foliage Debug] loader: Loaded {} weather observations for {} grid cells, skipped {} malformed",
            report.inserted,
            by_location.len(),
            report.skipped
        );
        Ok(report)
    }
}
