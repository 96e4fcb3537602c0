//! Per-tree timing corrections relative to the grid cell baseline.
//!
//! A grid cell's timeline is computed once for the cell's average elevation
//! and land use. A tree that sits higher, lower, or in a different land use
//! than its cell gets the shared timeline shifted by a whole number of days.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Days of shift per 100 m of elevation difference at full sensitivity.
pub const DAYS_PER_100M: f64 = 6.0;
/// Days of shift for an urban/rural mismatch at full sensitivity.
pub const URBAN_SHIFT_DAYS: f64 = 4.0;

/// How strongly a species responds to local elevation and urban heat, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentTraits {
    pub elevation_sensitivity: f64,
    pub urban_heat_island_effect: f64,
}

impl AdjustmentTraits {
    pub const fn new(elevation_sensitivity: f64, urban_heat_island_effect: f64) -> Self {
        AdjustmentTraits {
            elevation_sensitivity,
            urban_heat_island_effect,
        }
    }
}

impl Default for AdjustmentTraits {
    fn default() -> Self {
        AdjustmentTraits::new(0.6, 0.6)
    }
}

/// Sensitivity traits by USDA symbol, with defaults for anything unlisted.
#[derive(Debug, Clone, Default)]
pub struct AdjustmentTraitsTable {
    traits: HashMap<&'static str, AdjustmentTraits>,
    default: AdjustmentTraits,
}

impl AdjustmentTraitsTable {
    pub fn build() -> Self {
        let traits = HashMap::from([
            ("ACPL", AdjustmentTraits::new(0.7, 0.6)),
            ("ACRU", AdjustmentTraits::new(0.6, 0.7)),
            ("LIST2", AdjustmentTraits::new(0.5, 0.8)),
            ("QURU", AdjustmentTraits::new(0.8, 0.4)),
            ("PSME", AdjustmentTraits::new(0.9, 0.3)),
            ("PRCE", AdjustmentTraits::new(0.6, 0.7)),
            ("CRLA80", AdjustmentTraits::new(0.6, 0.6)),
            ("PYCA80", AdjustmentTraits::new(0.5, 0.8)),
            ("BEPE3", AdjustmentTraits::new(0.8, 0.5)),
            ("ACPA2", AdjustmentTraits::new(0.7, 0.6)),
            ("TICO2", AdjustmentTraits::new(0.5, 0.7)),
            ("PRSE3", AdjustmentTraits::new(0.6, 0.6)),
            ("GLTR", AdjustmentTraits::new(0.4, 0.8)),
            ("CABE8", AdjustmentTraits::new(0.6, 0.7)),
            ("COFL2", AdjustmentTraits::new(0.7, 0.5)),
            ("FRLA", AdjustmentTraits::new(0.6, 0.5)),
        ]);
        AdjustmentTraitsTable {
            traits,
            default: AdjustmentTraits::default(),
        }
    }

    pub fn get(&self, symbol: &str) -> AdjustmentTraits {
        self.traits.get(symbol).copied().unwrap_or(self.default)
    }
}

/// Whole days to shift a grid cell timeline for one tree.
///
/// Negative means earlier, positive later. Each input pair that is not fully
/// known contributes nothing. Halves round to the even day.
pub fn calculate_adjustment_days(
    table: &AdjustmentTraitsTable,
    species: &str,
    tree_elevation: Option<f64>,
    tree_is_urban: Option<bool>,
    grid_elevation: Option<f64>,
    grid_is_urban: Option<bool>,
) -> i32 {
    let traits = table.get(species);
    let mut total = 0.0;

    if let (Some(tree), Some(grid)) = (tree_elevation, grid_elevation) {
        // Higher than the cell average turns earlier.
        total -= (tree - grid) / 100.0 * DAYS_PER_100M * traits.elevation_sensitivity;
    }

    if let (Some(tree), Some(grid)) = (tree_is_urban, grid_is_urban) {
        let direction = match (tree, grid) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        total += direction * URBAN_SHIFT_DAYS * traits.urban_heat_island_effect;
    }

    let days = total.round_ties_even();
    log::debug!(
        "[Foliage Debug] adjustment: {} raw {:.3} days -> {}",
        species,
        total,
        days
    );
    days as i32
}

/// Rotate a timeline `days` positions later, wrapping at the ends.
///
/// Entry `i` of the result is entry `(i - days) mod len` of the input.
pub fn shift_timeline<T: Clone>(timeline: &[T], days: i32) -> Vec<T> {
    let mut shifted = timeline.to_vec();
    if days == 0 || timeline.is_empty() {
        return shifted;
    }
    let len = timeline.len() as i64;
    let k = (days as i64).rem_euclid(len) as usize;
    shifted.rotate_right(k);
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_tree_turns_earlier() {
        let table = AdjustmentTraitsTable::build();
        let days = calculate_adjustment_days(&table, "ACPL", Some(200.0), None, Some(100.0), None);
        assert_eq!(days, -4);
    }

    #[test]
    fn test_urban_tree_in_rural_cell_turns_later() {
        let table = AdjustmentTraitsTable::build();
        let days =
            calculate_adjustment_days(&table, "LIST2", None, Some(true), None, Some(false));
        assert_eq!(days, 3);
        let days =
            calculate_adjustment_days(&table, "LIST2", None, Some(false), None, Some(true));
        assert_eq!(days, -3);
    }

    #[test]
    fn test_terms_combine_and_missing_inputs_are_ignored() {
        let table = AdjustmentTraitsTable::build();
        // -(-50/100) * 6 * 0.8 = 2.4, plus 4 * 0.4 = 1.6
        let days = calculate_adjustment_days(
            &table,
            "QURU",
            Some(50.0),
            Some(true),
            Some(100.0),
            Some(false),
        );
        assert_eq!(days, 4);
        assert_eq!(
            calculate_adjustment_days(&table, "QURU", Some(500.0), None, None, None),
            0
        );
        assert_eq!(
            calculate_adjustment_days(&table, "QURU", None, Some(true), None, Some(true)),
            0
        );
    }

    #[test]
    fn test_unknown_species_uses_default_traits() {
        let table = AdjustmentTraitsTable::build();
        assert_eq!(table.get("ZZZZ"), AdjustmentTraits::new(0.6, 0.6));
        // 4 * 0.6 = 2.4
        let days = calculate_adjustment_days(&table, "ZZZZ", None, Some(true), None, Some(false));
        assert_eq!(days, 2);
    }

    #[test]
    fn test_halves_round_to_even() {
        let table = AdjustmentTraitsTable::build();
        // -(-125/100) * 6 * 0.6 = 4.5
        let days = calculate_adjustment_days(&table, "ZZZZ", Some(0.0), None, Some(125.0), None);
        assert_eq!(days, 4);
    }

    #[test]
    fn test_shift_round_trip() {
        let timeline: Vec<u32> = (0..365).collect();
        assert_eq!(shift_timeline(&timeline, 0), timeline);
        for days in [1, -1, 7, -30, 364, 365, 800, -800] {
            let there = shift_timeline(&timeline, days);
            assert_eq!(there.len(), timeline.len());
            assert_eq!(shift_timeline(&there, -days), timeline, "days {days}");
        }
    }

    #[test]
    fn test_shift_sources_from_earlier_index() {
        let timeline = vec!['a', 'b', 'c', 'd'];
        assert_eq!(shift_timeline(&timeline, 1), vec!['d', 'a', 'b', 'c']);
        assert_eq!(shift_timeline(&timeline, -1), vec!['b', 'c', 'd', 'a']);
        let empty: Vec<char> = Vec::new();
        assert!(shift_timeline(&empty, 3).is_empty());
    }
}
