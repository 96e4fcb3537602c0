//! Per-tree timeline export.
//!
//! The grid cell's timeline for the species is computed once, then shifted
//! by the tree's adjustment days.

use crate::atlas::{open_service, resolve_year};
use anyhow::Context;
use foliage_atlas::AtlasService;
use foliage_phenology::{
    adjust_thresholds, calculate_adjustment_days, resolve_states, shift_timeline,
    AdjustmentTraitsTable, Phase,
};
use foliage_utils::dates::format_date;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// A tree to resolve: its grid cell, year, species and own site attributes.
#[derive(Debug, Clone)]
pub struct TreeQuery {
    pub location_id: String,
    /// Latest year loaded for the cell when absent
    pub year: Option<i32>,
    pub species: String,
    pub tree_elevation: Option<f64>,
    pub tree_urban: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub date: String,
    pub day_of_year: u32,
    pub phase: Phase,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub hex: String,
}

/// Resolve the tree's timeline; returns the applied shift and one row per day.
pub fn tree_timeline(
    service: &AtlasService,
    tree: &TreeQuery,
) -> anyhow::Result<(i32, Vec<TimelineRow>)> {
    let year = resolve_year(service, &tree.location_id, tree.year)?;
    let (site, derived) = service.derived_for(&tree.location_id, year)?;
    let modifiers = adjust_thresholds(site.is_urban, site.elevation_m);
    let states = resolve_states(service.registry(), &tree.species, &derived, &modifiers)?;

    let shift = calculate_adjustment_days(
        &AdjustmentTraitsTable::build(),
        service
            .registry()
            .lookup(&tree.species)
            .map_or(tree.species.as_str(), |p| p.symbol),
        tree.tree_elevation,
        tree.tree_urban,
        Some(site.elevation_m),
        Some(site.is_urban),
    );
    let states = shift_timeline(&states, shift);

    let rows = derived
        .rows
        .iter()
        .zip(states)
        .map(|(day, state)| TimelineRow {
            date: format_date(&day.date),
            day_of_year: day.day_of_year,
            phase: state.phase,
            r: state.color.r,
            g: state.color.g,
            b: state.color.b,
            hex: state.color.to_hex(),
        })
        .collect();
    Ok((shift, rows))
}

pub fn write_timeline_csv<W: Write>(rows: &[TimelineRow], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run_timeline(
    db_path: &Path,
    tree: &TreeQuery,
    output: Option<&Path>,
    normalizer_config: Option<&Path>,
) -> anyhow::Result<()> {
    let service = open_service(db_path, normalizer_config)?;
    let (shift, rows) = tree_timeline(&service, tree)?;
    log::info!(
        "Timeline for {} in {}: {} days, shifted {} days",
        tree.species,
        tree.location_id,
        rows.len(),
        shift
    );
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_timeline_csv(&rows, file)?;
        }
        None => write_timeline_csv(&rows, std::io::stdout().lock())?,
    }
    Ok(())
}
