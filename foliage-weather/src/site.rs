use crate::error::{Result, WeatherError};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// A weather grid cell: the location a shared phenology atlas is computed for.
///
/// Elevation and the urban classification come from the upstream tile
/// classifiers and are treated as given.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Site {
    /// Grid cell identifier
    pub location_id: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Elevation in meters
    pub elevation_m: f64,
    /// Whether the cell is classified as urban land use
    pub is_urban: bool,
}

impl Site {
    pub fn new(location_id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Site {
            location_id: location_id.into(),
            latitude,
            longitude,
            elevation_m: 0.0,
            is_urban: false,
        }
    }

    pub fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = elevation_m;
        self
    }

    pub fn with_urban(mut self, is_urban: bool) -> Self {
        self.is_urban = is_urban;
        self
    }
}

/// Accepts the spellings the land-use classifier exports.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" | "" => Some(false),
        _ => None,
    }
}

impl TryFrom<StringRecord> for Site {
    type Error = WeatherError;

    fn try_from(record: StringRecord) -> Result<Self> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let malformed = |field: &'static str, reason: String| WeatherError::MalformedRow {
            line,
            field,
            reason,
        };
        let location_id = record.get(0).unwrap_or("").trim().to_string();
        if location_id.is_empty() {
            return Err(malformed("location_id", "is missing".to_string()));
        }
        let coordinate = |index: usize, field: &'static str| -> Result<f64> {
            let raw = record.get(index).unwrap_or("").trim();
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| malformed(field, format!("is not numeric ('{}')", raw)))
        };
        let latitude = coordinate(1, "latitude")?;
        let longitude = coordinate(2, "longitude")?;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(malformed("latitude", format!("is out of range ({})", latitude)));
        }
        let elevation_m = match record.get(3).map(str::trim) {
            None | Some("") => 0.0,
            Some(_) => coordinate(3, "elevation_m")?,
        };
        let urban_raw = record.get(4).unwrap_or("");
        let is_urban = parse_bool(urban_raw)
            .ok_or_else(|| malformed("is_urban", format!("is not a boolean ('{}')", urban_raw)))?;
        Ok(Site {
            location_id,
            latitude,
            longitude,
            elevation_m,
            is_urban,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_bool, Site};
    use crate::error::Result;
    use csv::ReaderBuilder;

    fn parse_sites(csv_data: &str) -> Result<Vec<Site>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        rdr.records().map(|row| Site::try_from(row?)).collect()
    }

    #[test]
    fn test_parse_sites() {
        let csv_data = "\
location_id,latitude,longitude,elevation_m,is_urban
SEA-01,47.6062,-122.3321,56,true
SEA-02,47.7,-122.25,,false
";
        let sites = parse_sites(csv_data).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].location_id, "SEA-01");
        assert!((sites[0].latitude - 47.6062).abs() < f64::EPSILON);
        assert!((sites[0].elevation_m - 56.0).abs() < f64::EPSILON);
        assert!(sites[0].is_urban);
        assert!((sites[1].elevation_m - 0.0).abs() < f64::EPSILON);
        assert!(!sites[1].is_urban);
    }

    #[test]
    fn test_bad_latitude_is_rejected() {
        let csv_data = "\
location_id,latitude,longitude,elevation_m,is_urban
X,147.0,-122.0,10,false
";
        assert!(parse_sites(csv_data).is_err());
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let csv_data = "\
location_id,latitude,longitude,elevation_m,is_urban
,47.0,-122.0,10,false
";
        assert!(parse_sites(csv_data).is_err());
    }

    #[test]
    fn test_parse_bool_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
