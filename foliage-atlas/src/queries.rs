//! Typed query methods over grid cells, weather and the atlas cache.

use crate::models::CachedAtlas;
use crate::Database;
use anyhow::Context;
use foliage_utils::dates::{format_date, parse_date, year_bounds};
use foliage_weather::{DailyWeatherRecord, Site, WeatherSeries};
use rusqlite::{params, OptionalExtension, Row};

fn site_from_row(row: &Row<'_>) -> rusqlite::Result<Site> {
    Ok(Site {
        location_id: row.get(0)?,
        latitude: row.get(1)?,
        longitude: row.get(2)?,
        elevation_m: row.get(3)?,
        is_urban: row.get(4)?,
    })
}

impl Database {
    // ───────────────────── Grid Cells ─────────────────────

    /// All grid cells ordered by id.
    pub fn query_grid_cells(&self) -> anyhow::Result<Vec<Site>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT location_id, latitude, longitude, elevation_m, is_urban
             FROM grid_cells
             ORDER BY location_id",
        )?;
        let rows = stmt
            .query_map([], site_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[Foliage Debug] query: query_grid_cells returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    pub fn query_grid_cell(&self, location_id: &str) -> anyhow::Result<Option<Site>> {
        let conn = self.conn.lock();
        let site = conn
            .query_row(
                "SELECT location_id, latitude, longitude, elevation_m, is_urban
                 FROM grid_cells
                 WHERE location_id = ?1",
                params![location_id],
                site_from_row,
            )
            .optional()?;
        Ok(site)
    }

    // ───────────────────── Weather ─────────────────────

    /// Daily weather for one cell and calendar year, in date order.
    ///
    /// An empty series means the cell has no weather for that year.
    pub fn query_weather_year(&self, location_id: &str, year: i32) -> anyhow::Result<WeatherSeries> {
        let (start, end) = year_bounds(year)?;
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT date, max_temp, min_temp, sunshine_duration, precipitation, soil_moisture
             FROM weather_observations
             WHERE location_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date",
        )?;
        let raw = stmt
            .query_map(
                params![location_id, format_date(&start), format_date(&end)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, f64>(4)?,
                        row.get::<_, f64>(5)?,
                    ))
                },
            )?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(raw.len());
        for (date, max_temp, min_temp, sunshine_duration, precipitation, soil_moisture) in raw {
            let date = parse_date(&date)
                .with_context(|| format!("stored weather date for {}", location_id))?;
            records.push(DailyWeatherRecord {
                date,
                max_temp,
                min_temp,
                sunshine_duration,
                precipitation,
                soil_moisture,
            });
        }
        let series = WeatherSeries::new(records)?;
        log::info!(
            "[Foliage Debug] query: query_weather_year({}, {}) returned {} records",
            location_id,
            year,
            series.len()
        );
        Ok(series)
    }

    /// Years that have at least one weather row for the cell.
    pub fn query_weather_years(&self, location_id: &str) -> anyhow::Result<Vec<i32>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT CAST(substr(date, 1, 4) AS INTEGER) AS year
             FROM weather_observations
             WHERE location_id = ?1
             ORDER BY year",
        )?;
        let years = stmt
            .query_map(params![location_id], |row| row.get(0))?
            .collect::<Result<Vec<i32>, _>>()?;
        Ok(years)
    }

    // ───────────────────── Atlas Cache ─────────────────────

    pub fn get_cached_atlas(&self, location_id: &str) -> anyhow::Result<Option<CachedAtlas>> {
        let conn = self.conn.lock();
        let cached = conn
            .query_row(
                "SELECT location_id, year, png, species_mapping, computed_at
                 FROM atlas_cache
                 WHERE location_id = ?1",
                params![location_id],
                |row| {
                    Ok(CachedAtlas {
                        location_id: row.get(0)?,
                        year: row.get(1)?,
                        png: row.get(2)?,
                        species_mapping: row.get(3)?,
                        computed_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(cached)
    }

    /// Store an atlas, replacing whatever the cell had cached before.
    pub fn put_cached_atlas(&self, atlas: &CachedAtlas) -> anyhow::Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO atlas_cache (location_id, year, png, species_mapping, computed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                atlas.location_id,
                atlas.year,
                atlas.png,
                atlas.species_mapping,
                atlas.computed_at
            ],
        )?;
        log::info!(
            "[Foliage Debug] query: cached {} byte atlas for {} ({})",
            atlas.png.len(),
            atlas.location_id,
            atlas.year
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::models::CachedAtlas;
    use crate::Database;

    fn seeded() -> Database {
        let db = Database::new().unwrap();
        db.load_grid_cells(
            "location_id,latitude,longitude,elevation_m,is_urban\n\
             SEA-02,47.7,-122.25,120,false\n\
             SEA-01,47.6062,-122.3321,56,true\n",
        )
        .unwrap();
        db.load_weather(
            "location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture\n\
             SEA-01,2023-12-31,6.0,1.0,3600,0.0,0.30\n\
             SEA-01,2024-01-02,9.0,3.1,8000,1.1,0.33\n\
             SEA-01,2024-01-01,8.1,2.3,7200,4.2,0.34\n\
             SEA-02,2024-01-01,7.0,2.0,7000,3.0,0.31\n",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_query_grid_cells_sorted() {
        let db = seeded();
        let cells = db.query_grid_cells().unwrap();
        let ids: Vec<&str> = cells.iter().map(|c| c.location_id.as_str()).collect();
        assert_eq!(ids, vec!["SEA-01", "SEA-02"]);
        assert!(cells[0].is_urban);
        assert!((cells[1].elevation_m - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_query_grid_cell() {
        let db = seeded();
        assert_eq!(
            db.query_grid_cell("SEA-02").unwrap().unwrap().location_id,
            "SEA-02"
        );
        assert!(db.query_grid_cell("NOPE").unwrap().is_none());
    }

    #[test]
    fn test_query_weather_year_filters_and_orders() {
        let db = seeded();
        let series = db.query_weather_year("SEA-01", 2024).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series.records()[0].date < series.records()[1].date);
        assert!(db.query_weather_year("SEA-01", 2022).unwrap().is_empty());
        assert!(db.query_weather_year("NOPE", 2024).unwrap().is_empty());
        assert_eq!(db.query_weather_years("SEA-01").unwrap(), vec![2023, 2024]);
    }

    #[test]
    fn test_atlas_cache_round_trip() {
        let db = seeded();
        assert!(db.get_cached_atlas("SEA-01").unwrap().is_none());
        let atlas = CachedAtlas {
            location_id: "SEA-01".to_string(),
            year: 2024,
            png: vec![137, 80, 78, 71],
            species_mapping: r#"{"ACPL":0}"#.to_string(),
            computed_at: "2024-06-01T00:00:00+00:00".to_string(),
        };
        db.put_cached_atlas(&atlas).unwrap();
        assert_eq!(db.get_cached_atlas("SEA-01").unwrap(), Some(atlas.clone()));

        let replaced = CachedAtlas {
            year: 2023,
            png: vec![1, 2, 3],
            ..atlas
        };
        db.put_cached_atlas(&replaced).unwrap();
        assert_eq!(db.get_cached_atlas("SEA-01").unwrap(), Some(replaced));
    }
}
