//! SQL schema for grid cells, their daily weather and the atlas cache.
//!
//! Applied as a single batch when the database is opened; every statement
//! is idempotent so reopening a file database is safe.

/// Returns the full SQL schema as a single batch string.
///
/// - `grid_cells` - one row per weather grid cell (coordinates, elevation, land use)
/// - `weather_observations` - validated daily weather per cell, one row per day
/// - `atlas_cache` - at most one encoded atlas per cell, tagged with its year
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS grid_cells (
        location_id TEXT PRIMARY KEY,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        elevation_m REAL NOT NULL DEFAULT 0,
        is_urban INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS weather_observations (
        location_id TEXT NOT NULL,
        date TEXT NOT NULL,
        max_temp REAL NOT NULL,
        min_temp REAL NOT NULL,
        sunshine_duration REAL NOT NULL,
        precipitation REAL NOT NULL,
        soil_moisture REAL NOT NULL,
        PRIMARY KEY (location_id, date)
    );
    CREATE INDEX IF NOT EXISTS idx_weather_date ON weather_observations(date);

    CREATE TABLE IF NOT EXISTS atlas_cache (
        location_id TEXT PRIMARY KEY,
        year INTEGER NOT NULL,
        png BLOB NOT NULL,
        species_mapping TEXT NOT NULL,
        computed_at TEXT NOT NULL
    );
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        for table in ["grid_cells", "weather_observations", "atlas_cache"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table '{}' should exist", table);
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
