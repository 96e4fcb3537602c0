/// Error types for atlas computation and caching
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    /// No weather rows exist for the requested location and year
    #[error("No weather data available: {0}")]
    NoData(String),

    /// The grid cell is not in the database
    #[error("Unknown grid cell '{0}'")]
    UnknownLocation(String),

    /// A species mapping is empty, has duplicates or has gaps in its rows
    #[error("Invalid species mapping: {0}")]
    InvalidMapping(String),

    /// Rows of a raster disagree in width or exceed PNG dimensions
    #[error("Invalid atlas raster: {0}")]
    InvalidRaster(String),

    /// PNG encoding or decoding failed
    #[error("Failed to encode atlas PNG: {0}")]
    Image(#[from] image::ImageError),

    /// Species mapping JSON could not be read or written
    #[error("Failed to handle species mapping JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Phenology(#[from] foliage_phenology::PhenologyError),

    /// The database layer failed
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Type alias for Results using AtlasError
pub type Result<T> = std::result::Result<T, AtlasError>;
