//! Atlas commands: batch precompute and single-cell export.

use anyhow::Context;
use foliage_atlas::{AtlasService, AtlasSource, Database};
use foliage_phenology::NormalizerConfig;
use log::info;
use std::path::Path;

/// Open the database and build a service, applying a normalizer config file if given.
pub fn open_service(db_path: &Path, normalizer_config: Option<&Path>) -> anyhow::Result<AtlasService> {
    let db = Database::open(db_path)?;
    let config = match normalizer_config {
        Some(path) => NormalizerConfig::from_json_file(path)?,
        None => NormalizerConfig::default(),
    };
    Ok(AtlasService::new(db).with_config(config))
}

/// `year` when given, otherwise the latest year with weather for the cell.
pub fn resolve_year(service: &AtlasService, location_id: &str, year: Option<i32>) -> anyhow::Result<i32> {
    if let Some(year) = year {
        return Ok(year);
    }
    let years = service.database().query_weather_years(location_id)?;
    match years.last() {
        Some(latest) => {
            info!("No year given for {}, using {}", location_id, latest);
            Ok(*latest)
        }
        None => anyhow::bail!("grid cell '{}' has no weather loaded", location_id),
    }
}

pub fn run_precompute(
    db_path: &Path,
    year: i32,
    normalizer_config: Option<&Path>,
) -> anyhow::Result<()> {
    let service = open_service(db_path, normalizer_config)?;
    let report = service.precompute_all(year)?;
    println!(
        "{}: {} computed, {} already cached, {} failed",
        report.year,
        report.computed,
        report.cached,
        report.failed.len()
    );
    for (location_id, reason) in &report.failed {
        println!("  {}: {}", location_id, reason);
    }
    Ok(())
}

pub fn run_atlas(
    db_path: &Path,
    location_id: &str,
    year: Option<i32>,
    output: &Path,
    normalizer_config: Option<&Path>,
) -> anyhow::Result<()> {
    let service = open_service(db_path, normalizer_config)?;
    let year = resolve_year(&service, location_id, year)?;
    let (png, source) = service.fetch(location_id, year)?;
    std::fs::write(output, &png)
        .with_context(|| format!("writing atlas to {}", output.display()))?;
    let origin = match source {
        AtlasSource::Cache => "cached",
        AtlasSource::Computed => "computed",
    };
    info!(
        "Atlas for {} ({}) {}: {} bytes -> {}",
        location_id,
        year,
        origin,
        png.len(),
        output.display()
    );
    println!("{}", service.mapping().to_json()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AtlasService {
        let db = Database::new().unwrap();
        db.load_weather(
            "location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture
SEA-01,2022-06-01,20.0,10.0,30000,0.0,0.3
SEA-01,2024-06-01,21.0,11.0,30000,0.0,0.3
SEA-01,2023-06-01,19.0,9.0,30000,0.0,0.3
",
        )
        .unwrap();
        AtlasService::new(db)
    }

    #[test]
    fn test_resolve_year_defaults_to_latest() {
        let service = service();
        assert_eq!(resolve_year(&service, "SEA-01", None).unwrap(), 2024);
        assert_eq!(resolve_year(&service, "SEA-01", Some(2022)).unwrap(), 2022);
        assert!(resolve_year(&service, "NOPE", None).is_err());
    }
}
