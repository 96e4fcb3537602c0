/// Error types for phenology computations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhenologyError {
    /// The derived series is empty, so there is nothing to resolve
    #[error("No weather data available to compute a phenology timeline")]
    NoData,

    /// A normalizer configuration could not be parsed
    #[error("Invalid normalizer configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A normalizer configuration parsed but holds unusable values
    #[error("Invalid normalizer configuration: {0}")]
    InvalidConfig(String),

    /// Weather input was rejected
    #[error(transparent)]
    Weather(#[from] foliage_weather::WeatherError),
}

/// Type alias for Results using PhenologyError
pub type Result<T> = std::result::Result<T, PhenologyError>;
