//! Species atlases and the SQLite store behind them.
//!
//! An atlas is a PNG with one row per species and one column per day of a
//! year, computed for a single weather grid cell. This crate loads grid
//! cells and their daily weather from CSV into SQLite, draws atlases with
//! [`encoder::compute_atlas`], and caches one encoded atlas per cell through
//! [`service::AtlasService`].
//!
//! # Usage
//!
//! ```rust
//! use foliage_atlas::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_grid_cells("location_id,latitude,longitude,elevation_m,is_urban\nSEA-01,47.6,-122.3,56,true\n").unwrap();
//! let cells = db.query_grid_cells().unwrap();
//! assert_eq!(cells.len(), 1);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod encoder;
pub mod error;
mod loader;
pub mod mapping;
pub mod models;
mod queries;
pub mod schema;
pub mod service;

pub use encoder::{compute_atlas, AtlasRaster};
pub use error::{AtlasError, Result};
pub use mapping::SpeciesMapping;
pub use models::{CachedAtlas, LoadReport};
pub use service::{AtlasService, AtlasSource, PrecomputeReport};

use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// SQLite database holding grid cells, weather and the atlas cache.
///
/// Cheap to clone; clones share one connection behind a mutex, so the
/// database can be handed to worker threads.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file and apply the schema.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        log::info!("[Foliage Debug] db: opening {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}
