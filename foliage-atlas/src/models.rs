//! Row structs returned by the database layer.

use serde::Serialize;

/// A stored atlas for one grid cell.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CachedAtlas {
    pub location_id: String,
    /// Calendar year the atlas was computed for
    pub year: i32,
    /// Encoded PNG bytes, returned verbatim on a cache hit
    #[serde(skip)]
    pub png: Vec<u8>,
    /// JSON object `{symbol: row}` used when the atlas was drawn
    pub species_mapping: String,
    /// UTC timestamp, RFC 3339
    pub computed_at: String,
}

/// Outcome of a CSV load.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct LoadReport {
    pub inserted: usize,
    pub skipped: usize,
}
