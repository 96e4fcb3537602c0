use crate::error::{Result, WeatherError};
use crate::record::DailyWeatherRecord;
use chrono::Datelike;
use foliage_utils::dates::days_in_year;

/// An ordered daily weather series for one location.
///
/// Dates are strictly increasing, so there is at most one record per
/// calendar day. An empty series is a valid value meaning "no data".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherSeries(Vec<DailyWeatherRecord>);

impl WeatherSeries {
    /// Build a series from records that are already in date order.
    pub fn new(records: Vec<DailyWeatherRecord>) -> Result<Self> {
        for window in records.windows(2) {
            let previous = window[0].date;
            let next = window[1].date;
            if next == previous {
                return Err(WeatherError::DuplicateDate(next));
            }
            if next < previous {
                return Err(WeatherError::OutOfOrder { previous, next });
            }
        }
        for record in &records {
            record.validate(0)?;
        }
        Ok(Self(records))
    }

    /// Build a series from records in any order; duplicates are still rejected.
    pub fn from_unsorted(mut records: Vec<DailyWeatherRecord>) -> Result<Self> {
        records.sort_by_key(|r| r.date);
        Self::new(records)
    }

    /// Restrict the series to a single calendar year.
    pub fn for_year(&self, year: i32) -> WeatherSeries {
        WeatherSeries(
            self.0
                .iter()
                .filter(|r| r.date.year() == year)
                .copied()
                .collect(),
        )
    }

    /// True when every day of `year` is present and nothing else is.
    pub fn is_complete_year(&self, year: i32) -> bool {
        self.0.len() == days_in_year(year) as usize
            && self.0.iter().all(|r| r.date.year() == year)
    }

    pub fn records(&self) -> &[DailyWeatherRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::WeatherSeries;
    use crate::date_range::DateRange;
    use crate::error::WeatherError;
    use crate::record::DailyWeatherRecord;
    use chrono::NaiveDate;

    fn record(date: NaiveDate) -> DailyWeatherRecord {
        DailyWeatherRecord {
            date,
            max_temp: 10.0,
            min_temp: 2.0,
            sunshine_duration: 3600.0,
            precipitation: 0.0,
            soil_moisture: 0.3,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_duplicate_dates_are_rejected() {
        let records = vec![record(ymd(2024, 1, 1)), record(ymd(2024, 1, 1))];
        let err = WeatherSeries::new(records).unwrap_err();
        assert!(matches!(err, WeatherError::DuplicateDate(_)));
    }

    #[test]
    fn test_out_of_order_is_rejected() {
        let records = vec![record(ymd(2024, 1, 2)), record(ymd(2024, 1, 1))];
        let err = WeatherSeries::new(records).unwrap_err();
        assert!(matches!(err, WeatherError::OutOfOrder { .. }));
    }

    #[test]
    fn test_from_unsorted_sorts() {
        let records = vec![record(ymd(2024, 1, 2)), record(ymd(2024, 1, 1))];
        let series = WeatherSeries::from_unsorted(records).unwrap();
        assert_eq!(series.records()[0].date, ymd(2024, 1, 1));
    }

    #[test]
    fn test_for_year_and_completeness() {
        let records: Vec<_> = DateRange(ymd(2023, 12, 30), ymd(2025, 1, 2))
            .map(record)
            .collect();
        let series = WeatherSeries::new(records).unwrap();
        let year = series.for_year(2024);
        assert_eq!(year.len(), 366);
        assert!(year.is_complete_year(2024));
        assert!(!series.is_complete_year(2024));
        assert!(series.for_year(2030).is_empty());
    }
}
