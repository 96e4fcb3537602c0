use crate::color::Rgb;
use crate::error::{PhenologyError, Result};
use crate::model::{resolve_daily_state, DailyState};
use crate::normalize::DerivedSeries;
use crate::registry::SpeciesRegistry;
use crate::thresholds::LocationModifiers;
use serde::Serialize;

/// One color per day of a derived series, for one species at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhenologyTimeline {
    /// Symbol of the profile that produced the colors
    pub symbol: String,
    colors: Vec<Rgb>,
}

impl PhenologyTimeline {
    pub fn new(symbol: impl Into<String>, colors: Vec<Rgb>) -> Self {
        PhenologyTimeline {
            symbol: symbol.into(),
            colors,
        }
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn into_colors(self) -> Vec<Rgb> {
        self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// A copy moved `days` later in the year, wrapping around the ends.
    pub fn shifted(&self, days: i32) -> PhenologyTimeline {
        PhenologyTimeline {
            symbol: self.symbol.clone(),
            colors: crate::adjustment::shift_timeline(&self.colors, days),
        }
    }
}

/// Run a species over every day of `derived`.
///
/// Unknown symbols use the registry's default profile.
pub fn resolve_states(
    registry: &SpeciesRegistry,
    symbol: &str,
    derived: &DerivedSeries,
    modifiers: &LocationModifiers,
) -> Result<Vec<DailyState>> {
    if derived.is_empty() {
        return Err(PhenologyError::NoData);
    }
    let adjusted = registry.get(symbol).adjusted(modifiers);
    Ok(derived
        .rows
        .iter()
        .map(|row| resolve_daily_state(row, &adjusted))
        .collect())
}

/// Color timeline of a species over `derived`, one entry per row.
pub fn resolve_timeline(
    registry: &SpeciesRegistry,
    symbol: &str,
    derived: &DerivedSeries,
    modifiers: &LocationModifiers,
) -> Result<PhenologyTimeline> {
    let states = resolve_states(registry, symbol, derived, modifiers)?;
    let profile = registry.get(symbol);
    Ok(PhenologyTimeline::new(
        profile.symbol,
        states.into_iter().map(|s| s.color).collect(),
    ))
}
