use crate::error::{Result, WeatherError};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use foliage_utils::dates::parse_date;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Expected number of columns in a weather CSV row.
pub const CSV_ROW_LENGTH: usize = 7;

/// One day of normalized weather at a location.
///
/// Produced by the upstream fetchers; every numeric field is required and
/// finite. Sunshine, precipitation and soil moisture are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeatherRecord {
    pub date: NaiveDate,
    /// Daily maximum temperature in °C
    pub max_temp: f64,
    /// Daily minimum temperature in °C
    pub min_temp: f64,
    /// Sunshine duration in seconds
    pub sunshine_duration: f64,
    /// Precipitation sum in mm
    pub precipitation: f64,
    /// Volumetric soil moisture in m³/m³
    pub soil_moisture: f64,
}

impl DailyWeatherRecord {
    /// Check that every numeric field holds a usable value.
    ///
    /// Cumulative sums downstream carry a bad value forward for the rest of
    /// the year, so anything non-finite or physically impossible is rejected
    /// here.
    pub fn validate(&self, line: u64) -> Result<()> {
        let fields = [
            ("max_temp", self.max_temp, false),
            ("min_temp", self.min_temp, false),
            ("sunshine_duration", self.sunshine_duration, true),
            ("precipitation", self.precipitation, true),
            ("soil_moisture", self.soil_moisture, true),
        ];
        for (field, value, non_negative) in fields {
            if !value.is_finite() {
                return Err(WeatherError::MalformedRow {
                    line,
                    field,
                    reason: format!("is not finite ({})", value),
                });
            }
            if non_negative && value < 0.0 {
                return Err(WeatherError::MalformedRow {
                    line,
                    field,
                    reason: format!("is negative ({})", value),
                });
            }
        }
        Ok(())
    }
}

/// A weather record tagged with the grid cell it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub location_id: String,
    pub record: DailyWeatherRecord,
}

impl WeatherObservation {
    /// Parse a weather CSV string into observations.
    ///
    /// Expected format (with headers):
    /// `location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture`
    ///
    /// Fails on the first malformed row.
    pub fn parse_weather_csv(csv_object: &str) -> Result<Vec<WeatherObservation>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let mut observations = Vec::new();
        for row in rdr.records() {
            let record = row?;
            observations.push(WeatherObservation::try_from(record)?);
        }
        Ok(observations)
    }

    /// Parse a weather CSV string, skipping malformed rows instead of failing.
    ///
    /// Returns the accepted observations together with the rejected rows'
    /// errors so the caller can report them.
    pub fn parse_weather_csv_lenient(
        csv_object: &str,
    ) -> Result<(Vec<WeatherObservation>, Vec<WeatherError>)> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let mut observations = Vec::new();
        let mut rejected = Vec::new();
        for row in rdr.records() {
            let record = row?;
            match WeatherObservation::try_from(record) {
                Ok(observation) => observations.push(observation),
                Err(e) => rejected.push(e),
            }
        }
        log::debug!(
            "[Foliage Debug] weather: parsed {} rows, rejected {}",
            observations.len(),
            rejected.len()
        );
        Ok((observations, rejected))
    }

    /// Group a vector of observations by location_id.
    pub fn vector_to_hashmap(
        vec_observations: Vec<WeatherObservation>,
    ) -> HashMap<String, Vec<DailyWeatherRecord>> {
        let mut result: HashMap<String, Vec<DailyWeatherRecord>> = HashMap::new();
        for obs in vec_observations {
            result.entry(obs.location_id).or_default().push(obs.record);
        }
        result
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn numeric_field(record: &StringRecord, index: usize, field: &'static str) -> Result<f64> {
    let line = line_of(record);
    let raw = record
        .get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| WeatherError::MalformedRow {
            line,
            field,
            reason: "is missing".to_string(),
        })?;
    raw.parse::<f64>().map_err(|_| WeatherError::MalformedRow {
        line,
        field,
        reason: format!("is not numeric ('{}')", raw),
    })
}

impl TryFrom<StringRecord> for WeatherObservation {
    type Error = WeatherError;

    fn try_from(value: StringRecord) -> Result<Self> {
        let line = line_of(&value);
        if value.len() < CSV_ROW_LENGTH {
            return Err(WeatherError::MalformedRow {
                line,
                field: "row",
                reason: format!("has {} columns, expected {}", value.len(), CSV_ROW_LENGTH),
            });
        }
        let location_id = value.get(0).unwrap_or("").trim().to_string();
        if location_id.is_empty() {
            return Err(WeatherError::MalformedRow {
                line,
                field: "location_id",
                reason: "is missing".to_string(),
            });
        }
        let date = parse_date(value.get(1).unwrap_or(""))
            .map_err(|source| WeatherError::DateParse { line, source })?;
        let record = DailyWeatherRecord {
            date,
            max_temp: numeric_field(&value, 2, "max_temp")?,
            min_temp: numeric_field(&value, 3, "min_temp")?,
            sunshine_duration: numeric_field(&value, 4, "sunshine_duration")?,
            precipitation: numeric_field(&value, 5, "precipitation")?,
            soil_moisture: numeric_field(&value, 6, "soil_moisture")?,
        };
        record.validate(line)?;
        Ok(WeatherObservation {
            location_id,
            record,
        })
    }
}

#[cfg(test)]
mod test {
    use super::WeatherObservation;
    use crate::error::WeatherError;

    const STR_RESULT: &str = "\
location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture
SEA-01,2024-01-01,8.1,2.3,11520.0,4.2,0.34
SEA-01,2024-01-02,7.4,1.9,9000.0,0.0,0.33
SEA-02,2024-01-01,6.0,-1.5,14400.0,0.0,0.29
";

    #[test]
    fn test_parse_weather_csv() {
        let observations = WeatherObservation::parse_weather_csv(STR_RESULT).unwrap();
        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0].location_id, "SEA-01");
        assert!((observations[0].record.max_temp - 8.1).abs() < f64::EPSILON);
        assert!((observations[2].record.min_temp - (-1.5)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_group_by_location() {
        let observations = WeatherObservation::parse_weather_csv(STR_RESULT).unwrap();
        let grouped = WeatherObservation::vector_to_hashmap(observations);
        assert_eq!(grouped["SEA-01"].len(), 2);
        assert_eq!(grouped["SEA-02"].len(), 1);
    }

    #[test]
    fn test_missing_numeric_field_is_rejected() {
        let csv = "\
location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture
SEA-01,2024-01-01,8.1,,11520.0,4.2,0.34
";
        let err = WeatherObservation::parse_weather_csv(csv).unwrap_err();
        match err {
            WeatherError::MalformedRow { line, field, .. } => {
                assert_eq!(line, 2);
                assert_eq!(field, "min_temp");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_and_negative_values_are_rejected() {
        let csv = "\
location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture
SEA-01,2024-01-01,NaN,2.0,11520.0,4.2,0.34
SEA-01,2024-01-02,8.0,2.0,11520.0,-1.0,0.34
SEA-01,2024-01-03,8.0,2.0,11520.0,1.0,0.34
";
        let (accepted, rejected) = WeatherObservation::parse_weather_csv_lenient(csv).unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(rejected.len(), 2);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let csv = "\
location_id,date,max_temp,min_temp,sunshine_duration,precipitation,soil_moisture
SEA-01,01/02/2024,8.0,2.0,11520.0,4.2,0.34
";
        let err = WeatherObservation::parse_weather_csv(csv).unwrap_err();
        assert!(matches!(err, WeatherError::DateParse { line: 2, .. }));
    }
}
