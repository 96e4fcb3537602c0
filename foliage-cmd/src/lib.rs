//! Command implementations for the foliage CLI.
//!
//! Provides subcommands for loading grid cells and weather into a SQLite
//! database, computing and caching species atlases, and inspecting a single
//! tree's timeline or timing adjustment.

use clap::Subcommand;
use std::path::PathBuf;

pub mod atlas;
pub mod load;
pub mod species;
pub mod timeline;

#[derive(Subcommand)]
pub enum Command {
    /// Load grid cells and/or daily weather CSVs into the database
    Load {
        /// SQLite database file (created if missing)
        #[arg(long)]
        db: PathBuf,

        /// Grid cells CSV: location_id,latitude,longitude,elevation_m,is_urban
        #[arg(long)]
        cells_csv: Option<PathBuf>,

        /// Weather CSV: location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture
        #[arg(long)]
        weather_csv: Option<PathBuf>,
    },

    /// Compute and cache the atlas of every grid cell for a year
    Precompute {
        #[arg(long)]
        db: PathBuf,

        #[arg(long)]
        year: i32,

        /// JSON file overriding normalizer constants
        #[arg(long)]
        normalizer_config: Option<PathBuf>,
    },

    /// Write one grid cell's atlas PNG, computing it if the cache is stale
    Atlas {
        #[arg(long)]
        db: PathBuf,

        #[arg(long)]
        location: String,

        /// Defaults to the latest year with weather for the cell
        #[arg(long)]
        year: Option<i32>,

        /// Output PNG path
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// JSON file overriding normalizer constants
        #[arg(long)]
        normalizer_config: Option<PathBuf>,
    },

    /// Print one species' daily phase and color for a tree in a grid cell
    Timeline {
        #[arg(long)]
        db: PathBuf,

        #[arg(long)]
        location: String,

        /// Defaults to the latest year with weather for the cell
        #[arg(long)]
        year: Option<i32>,

        /// USDA symbol or common-name alias
        #[arg(long)]
        species: String,

        /// Tree elevation in meters
        #[arg(long)]
        tree_elevation: Option<f64>,

        /// Whether the tree stands on urban land
        #[arg(long, value_parser = parse_bool_arg)]
        tree_urban: Option<bool>,

        /// Output CSV path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// JSON file overriding normalizer constants
        #[arg(long)]
        normalizer_config: Option<PathBuf>,
    },

    /// Days a tree's timeline shifts relative to its grid cell
    Adjust {
        #[arg(long)]
        species: String,

        #[arg(long)]
        tree_elevation: Option<f64>,

        #[arg(long, value_parser = parse_bool_arg)]
        tree_urban: Option<bool>,

        #[arg(long)]
        grid_elevation: Option<f64>,

        #[arg(long, value_parser = parse_bool_arg)]
        grid_urban: Option<bool>,
    },

    /// List registered species and their atlas rows
    Species,
}

fn parse_bool_arg(raw: &str) -> Result<bool, String> {
    foliage_weather::site::parse_bool(raw)
        .filter(|_| !raw.trim().is_empty())
        .ok_or_else(|| format!("expected true or false, got '{}'", raw))
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Load {
            db,
            cells_csv,
            weather_csv,
        } => load::run_load(&db, cells_csv.as_deref(), weather_csv.as_deref()),
        Command::Precompute {
            db,
            year,
            normalizer_config,
        } => atlas::run_precompute(&db, year, normalizer_config.as_deref()),
        Command::Atlas {
            db,
            location,
            year,
            output,
            normalizer_config,
        } => atlas::run_atlas(&db, &location, year, &output, normalizer_config.as_deref()),
        Command::Timeline {
            db,
            location,
            year,
            species,
            tree_elevation,
            tree_urban,
            output,
            normalizer_config,
        } => timeline::run_timeline(
            &db,
            &timeline::TreeQuery {
                location_id: location,
                year,
                species,
                tree_elevation,
                tree_urban,
            },
            output.as_deref(),
            normalizer_config.as_deref(),
        ),
        Command::Adjust {
            species,
            tree_elevation,
            tree_urban,
            grid_elevation,
            grid_urban,
        } => species::run_adjust(
            &species,
            tree_elevation,
            tree_urban,
            grid_elevation,
            grid_urban,
        ),
        Command::Species => species::run_species(),
    }
}
