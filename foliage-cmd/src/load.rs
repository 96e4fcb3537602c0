//! Load CSV inputs into the SQLite database.

use anyhow::Context;
use foliage_atlas::Database;
use log::info;
use std::path::Path;

pub fn run_load(
    db_path: &Path,
    cells_csv: Option<&Path>,
    weather_csv: Option<&Path>,
) -> anyhow::Result<()> {
    if cells_csv.is_none() && weather_csv.is_none() {
        anyhow::bail!("nothing to load: pass --cells-csv and/or --weather-csv");
    }
    let db = Database::open(db_path)?;

    if let Some(path) = cells_csv {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading grid cells from {}", path.display()))?;
        let report = db.load_grid_cells(&data)?;
        println!(
            "grid cells: {} loaded, {} skipped",
            report.inserted, report.skipped
        );
    }

    if let Some(path) = weather_csv {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading weather from {}", path.display()))?;
        let report = db.load_weather(&data)?;
        println!(
            "weather: {} loaded, {} skipped",
            report.inserted, report.skipped
        );
    }

    info!("Load complete. Database: {}", db_path.display());
    Ok(())
}
