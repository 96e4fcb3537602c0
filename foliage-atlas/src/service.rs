//! Cached atlas access with at most one computation in flight per cell and year.

use crate::encoder::compute_atlas;
use crate::error::{AtlasError, Result};
use crate::mapping::SpeciesMapping;
use crate::models::CachedAtlas;
use crate::Database;
use dashmap::DashMap;
use foliage_phenology::{
    adjust_thresholds, normalize, DerivedSeries, NormalizerConfig, SpeciesRegistry,
};
use foliage_weather::Site;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Where the bytes of an atlas came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AtlasSource {
    Cache,
    Computed,
}

/// Summary of a [`AtlasService::precompute_all`] run.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PrecomputeReport {
    pub year: i32,
    pub computed: usize,
    pub cached: usize,
    /// (location_id, error message) for every cell that failed
    pub failed: Vec<(String, String)>,
}

impl PrecomputeReport {
    pub fn total(&self) -> usize {
        self.computed + self.cached + self.failed.len()
    }
}

type FlightKey = (String, i32);

pub struct AtlasService {
    db: Database,
    registry: SpeciesRegistry,
    mapping: SpeciesMapping,
    config: NormalizerConfig,
    in_flight: DashMap<FlightKey, Arc<Mutex<()>>>,
    computations: AtomicUsize,
}

impl AtlasService {
    /// Service over `db` with the built-in species, default mapping and default normalizer.
    pub fn new(db: Database) -> Self {
        AtlasService {
            db,
            registry: SpeciesRegistry::build(),
            mapping: SpeciesMapping::default(),
            config: NormalizerConfig::default(),
            in_flight: DashMap::new(),
            computations: AtomicUsize::new(0),
        }
    }

    pub fn with_config(mut self, config: NormalizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    pub fn mapping(&self) -> &SpeciesMapping {
        &self.mapping
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Number of atlases this service has computed (cache hits excluded).
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::SeqCst)
    }

    /// PNG bytes of the atlas for a cell and year.
    ///
    /// A cached atlas for the same year is returned byte-for-byte. Otherwise
    /// the atlas is computed, stored over any previous entry, and returned.
    pub fn get_or_compute(&self, location_id: &str, year: i32) -> Result<Vec<u8>> {
        self.fetch(location_id, year).map(|(png, _)| png)
    }

    /// Like [`get_or_compute`](Self::get_or_compute), also reporting whether the cache was hit.
    pub fn fetch(&self, location_id: &str, year: i32) -> Result<(Vec<u8>, AtlasSource)> {
        if let Some(png) = self.cached(location_id, year)? {
            log::info!("[Foliage Debug] atlas: cache hit {} ({})", location_id, year);
            return Ok((png, AtlasSource::Cache));
        }

        let key: FlightKey = (location_id.to_string(), year);
        let lock = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock();

        // Another caller may have finished while this one waited.
        if let Some(png) = self.cached(location_id, year)? {
            log::debug!(
                "[Foliage Debug] atlas: {} ({}) filled while waiting",
                location_id,
                year
            );
            return Ok((png, AtlasSource::Cache));
        }

        log::info!("[Foliage Debug] atlas: cache miss {} ({})", location_id, year);
        let result = self.compute_and_store(location_id, year);
        self.in_flight.remove(&key);
        result.map(|png| (png, AtlasSource::Computed))
    }

    fn cached(&self, location_id: &str, year: i32) -> Result<Option<Vec<u8>>> {
        Ok(self
            .db
            .get_cached_atlas(location_id)?
            .filter(|atlas| atlas.year == year)
            .map(|atlas| atlas.png))
    }

    /// Grid cell and derived weather for a cell and year.
    pub fn derived_for(&self, location_id: &str, year: i32) -> Result<(Site, DerivedSeries)> {
        let site = self
            .db
            .query_grid_cell(location_id)?
            .ok_or_else(|| AtlasError::UnknownLocation(location_id.to_string()))?;
        let weather = self.db.query_weather_year(location_id, year)?;
        if weather.is_empty() {
            return Err(AtlasError::NoData(format!(
                "grid cell '{}' has no weather for {}",
                location_id, year
            )));
        }
        if !weather.is_complete_year(year) {
            log::warn!(
                "[Foliage Debug] atlas: {} has {} days of weather for {}, atlas will be narrower",
                location_id,
                weather.len(),
                year
            );
        }
        let derived = normalize(&weather, &site, &self.config);
        Ok((site, derived))
    }

    fn compute_and_store(&self, location_id: &str, year: i32) -> Result<Vec<u8>> {
        let (site, derived) = self.derived_for(location_id, year)?;
        let modifiers = adjust_thresholds(site.is_urban, site.elevation_m);
        let raster = compute_atlas(&self.registry, &self.mapping, &derived, &modifiers)?;
        let png = raster.encode_png()?;
        self.computations.fetch_add(1, Ordering::SeqCst);

        self.db.put_cached_atlas(&CachedAtlas {
            location_id: location_id.to_string(),
            year,
            png: png.clone(),
            species_mapping: self.mapping.to_json()?,
            computed_at: chrono::Utc::now().to_rfc3339(),
        })?;
        Ok(png)
    }

    /// Make sure every grid cell has an atlas for `year`.
    ///
    /// A cell that fails is logged and recorded in the report; the remaining
    /// cells are still processed.
    pub fn precompute_all(&self, year: i32) -> Result<PrecomputeReport> {
        let cells = self.db.query_grid_cells()?;
        let mut report = PrecomputeReport {
            year,
            ..Default::default()
        };
        log::info!(
            "[Foliage Debug] precompute: {} grid cells for {}",
            cells.len(),
            year
        );
        for (i, cell) in cells.iter().enumerate() {
            match self.fetch(&cell.location_id, year) {
                Ok((png, AtlasSource::Computed)) => {
                    log::info!(
                        "[Foliage Debug] precompute: {}/{} {} saved {} bytes",
                        i + 1,
                        cells.len(),
                        cell.location_id,
                        png.len()
                    );
                    report.computed += 1;
                }
                Ok((_, AtlasSource::Cache)) => report.cached += 1,
                Err(e @ AtlasError::NoData(_)) => {
                    log::warn!(
                        "[Foliage Debug] precompute: skipping {}: {}",
                        cell.location_id,
                        e
                    );
                    report.failed.push((cell.location_id.clone(), e.to_string()));
                }
                Err(e) => {
                    log::error!(
                        "[Foliage Debug] precompute: {} failed: {}",
                        cell.location_id,
                        e
                    );
                    report.failed.push((cell.location_id.clone(), e.to_string()));
                }
            }
        }
        log::info!(
            "[Foliage Debug] precompute: {} computed, {} cached, {} failed",
            report.computed,
            report.cached,
            report.failed.len()
        );
        Ok(report)
    }
}
