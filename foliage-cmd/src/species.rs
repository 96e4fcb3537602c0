//! Registry listing and the adjustment calculator.

use foliage_atlas::SpeciesMapping;
use foliage_phenology::{calculate_adjustment_days, AdjustmentTraitsTable, SpeciesRegistry};

/// One line per registered species: atlas row, symbol, alias, names, traits.
pub fn species_listing(registry: &SpeciesRegistry, mapping: &SpeciesMapping) -> Vec<String> {
    let traits = AdjustmentTraitsTable::build();
    registry
        .profiles()
        .iter()
        .map(|profile| {
            let row = mapping
                .row_of(profile.symbol)
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string());
            let t = traits.get(profile.symbol);
            format!(
                "{:>3}  {:<7} {:<26} {:<28} {:<32} elev {:.1} uhi {:.1}",
                row,
                profile.symbol,
                profile.alias,
                profile.common_name,
                profile.scientific_name,
                t.elevation_sensitivity,
                t.urban_heat_island_effect
            )
        })
        .collect()
}

pub fn run_species() -> anyhow::Result<()> {
    let registry = SpeciesRegistry::build();
    let mapping = SpeciesMapping::default();
    for line in species_listing(&registry, &mapping) {
        println!("{}", line);
    }
    println!(
        "default: {}; mapping: {}",
        registry.default_profile().symbol,
        mapping.to_json()?
    );
    Ok(())
}

pub fn run_adjust(
    species: &str,
    tree_elevation: Option<f64>,
    tree_urban: Option<bool>,
    grid_elevation: Option<f64>,
    grid_urban: Option<bool>,
) -> anyhow::Result<()> {
    let registry = SpeciesRegistry::build();
    // Aliases resolve to their symbol; unknown species keep the default traits.
    let symbol = registry.lookup(species).map_or(species, |p| p.symbol);
    let days = calculate_adjustment_days(
        &AdjustmentTraitsTable::build(),
        symbol,
        tree_elevation,
        tree_urban,
        grid_elevation,
        grid_urban,
    );
    log::info!("Adjustment for {} ({}): {} days", species, symbol, days);
    println!("{}", days);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_has_a_row_per_species() {
        let lines = species_listing(&SpeciesRegistry::build(), &SpeciesMapping::default());
        assert_eq!(lines.len(), 16);
        assert!(lines[0].trim_start().starts_with("0  ACPL"));
        assert!(lines[15].contains("FRLA"));
    }
}
