/// Error types for weather and site inputs
use thiserror::Error;

/// Main error type for weather input operations
#[derive(Error, Debug)]
pub enum WeatherError {
    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A row is missing a field or carries a non-numeric / non-finite value
    #[error("Malformed row at line {line}: field '{field}' {reason}")]
    MalformedRow {
        line: u64,
        field: &'static str,
        reason: String,
    },

    /// Date parsing failed
    #[error("Failed to parse date at line {line}: {source}")]
    DateParse {
        line: u64,
        source: foliage_utils::error::DateError,
    },

    /// Records are not in ascending date order
    #[error("Weather records out of order: {previous} is followed by {next}")]
    OutOfOrder {
        previous: chrono::NaiveDate,
        next: chrono::NaiveDate,
    },

    /// The same calendar day appears twice
    #[error("Duplicate weather record for {0}")]
    DuplicateDate(chrono::NaiveDate),
}

/// Type alias for Results using WeatherError
pub type Result<T> = std::result::Result<T, WeatherError>;
