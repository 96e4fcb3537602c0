//! Daylight duration from solar geometry.
//!
//! Uses the NOAA fractional-year series for solar declination and the
//! standard sunrise altitude of -0.833° (atmospheric refraction plus the
//! solar radius). Longitude only shifts the clock time of sunrise, not the
//! length of the day, so it is not an input here.

use chrono::{Datelike, NaiveDate};
use foliage_utils::dates::days_in_year;
use std::f64::consts::PI;

/// Solar altitude at sunrise and sunset, in degrees.
pub const SUNRISE_ALTITUDE_DEG: f64 = -0.833;

/// Solar declination in radians for a calendar date, evaluated at local noon.
pub fn solar_declination(date: &NaiveDate) -> f64 {
    let year_len = days_in_year(date.year()) as f64;
    let gamma = 2.0 * PI / year_len * (date.ordinal() as f64 - 1.0);
    0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin() - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin()
}

/// Hours between sunrise and sunset at `latitude` on `date`.
///
/// Returns `None` when the sun never crosses the horizon that day (polar
/// day or polar night), or when the latitude is not a valid coordinate.
pub fn day_length_hours(latitude: f64, date: &NaiveDate) -> Option<f64> {
    if !latitude.is_finite() || latitude.abs() > 90.0 {
        return None;
    }
    let phi = latitude.to_radians();
    let delta = solar_declination(date);
    let denominator = phi.cos() * delta.cos();
    let cos_hour_angle =
        (SUNRISE_ALTITUDE_DEG.to_radians().sin() - phi.sin() * delta.sin()) / denominator;
    if !cos_hour_angle.is_finite() || !(-1.0..=1.0).contains(&cos_hour_angle) {
        return None;
    }
    let hour_angle_deg = cos_hour_angle.acos().to_degrees();
    Some(2.0 * hour_angle_deg / 15.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_equator_is_about_twelve_hours() {
        for date in [ymd(2024, 3, 20), ymd(2024, 6, 21), ymd(2024, 12, 21)] {
            let hours = day_length_hours(0.0, &date).unwrap();
            assert!((hours - 12.1).abs() < 0.15, "{date}: {hours}");
        }
    }

    #[test]
    fn test_seattle_solstices() {
        let summer = day_length_hours(47.6, &ymd(2024, 6, 21)).unwrap();
        let winter = day_length_hours(47.6, &ymd(2024, 12, 21)).unwrap();
        assert!((summer - 16.0).abs() < 0.2, "summer {summer}");
        assert!((winter - 8.4).abs() < 0.2, "winter {winter}");
    }

    #[test]
    fn test_polar_day_and_night_have_no_sunrise() {
        assert!(day_length_hours(78.0, &ymd(2024, 6, 21)).is_none());
        assert!(day_length_hours(78.0, &ymd(2024, 12, 21)).is_none());
        assert!(day_length_hours(91.0, &ymd(2024, 3, 1)).is_none());
    }

    #[test]
    fn test_declination_extremes() {
        let june = solar_declination(&ymd(2024, 6, 21)).to_degrees();
        let december = solar_declination(&ymd(2024, 12, 21)).to_degrees();
        assert!((june - 23.44).abs() < 0.3);
        assert!((december + 23.44).abs() < 0.3);
    }
}
