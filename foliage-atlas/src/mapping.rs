//! Which species occupies which atlas row.

use crate::error::{AtlasError, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// Atlas rows shipped to clients, top to bottom.
pub const DEFAULT_ATLAS_SPECIES: [&str; 16] = [
    "ACPL", "ACRU", "LIST2", "QURU", "PSME", "PRCE", "CRLA80", "PYCA80", "BEPE3", "ACPA2",
    "TICO2", "PRSE3", "GLTR", "CABE8", "COFL2", "FRLA",
];

/// Ordered list of species symbols; the position of a symbol is its atlas row.
///
/// Serializes as a JSON object `{symbol: row}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HashMap<String, usize>")]
pub struct SpeciesMapping {
    symbols: Vec<String>,
}

impl SpeciesMapping {
    /// Build a mapping from symbols in row order.
    pub fn new(symbols: Vec<String>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(AtlasError::InvalidMapping("no species".to_string()));
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if symbol.trim().is_empty() {
                return Err(AtlasError::InvalidMapping("blank species symbol".to_string()));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(AtlasError::InvalidMapping(format!(
                    "'{}' appears more than once",
                    symbol
                )));
            }
        }
        Ok(SpeciesMapping { symbols })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Atlas row of `symbol`, if it is mapped.
    pub fn row_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for SpeciesMapping {
    fn default() -> Self {
        SpeciesMapping {
            symbols: DEFAULT_ATLAS_SPECIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Serialize for SpeciesMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.symbols.len()))?;
        for (row, symbol) in self.symbols.iter().enumerate() {
            map.serialize_entry(symbol, &row)?;
        }
        map.end()
    }
}

impl TryFrom<HashMap<String, usize>> for SpeciesMapping {
    type Error = AtlasError;

    /// Rows must be exactly `0..n` with no gaps.
    fn try_from(rows: HashMap<String, usize>) -> Result<Self> {
        let mut slots: Vec<Option<String>> = vec![None; rows.len()];
        for (symbol, row) in rows {
            let Some(slot) = slots.get_mut(row) else {
                return Err(AtlasError::InvalidMapping(format!(
                    "row {} of '{}' is out of range",
                    row, symbol
                )));
            };
            if let Some(other) = slot {
                return Err(AtlasError::InvalidMapping(format!(
                    "row {} is used by both '{}' and '{}'",
                    row, other, symbol
                )));
            }
            *slot = Some(symbol);
        }
        // Every slot is filled once no row collided and none was out of range.
        SpeciesMapping::new(slots.into_iter().flatten().collect())
    }
}
