//! Solar position (NOAA general solar position equations).
//!
//! Accurate to well under a degree between 1800 and 2100, which is far
//! finer than the 11-step brightness scale needs. No refraction correction is
//! applied, so the sun sits exactly on the horizon at elevation 0.

use chrono::{DateTime, Timelike, Utc};

const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
const J2000_JULIAN_DAY: f64 = 2_451_545.0;
const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const MINUTES_PER_DAY: f64 = 1_440.0;

/// Solar elevation angle in degrees above the horizon (negative below it).
///
/// # Arguments
///
/// * `at` - Instant of observation
/// * `latitude` - Degrees, north positive
/// * `longitude` - Degrees, east positive
pub fn solar_elevation(at: DateTime<Utc>, latitude: f64, longitude: f64) -> f64 {
    let unix_seconds = at.timestamp() as f64 + f64::from(at.timestamp_subsec_millis()) / 1000.0;
    let julian_day = unix_seconds / SECONDS_PER_DAY + UNIX_EPOCH_JULIAN_DAY;
    let t = (julian_day - J2000_JULIAN_DAY) / DAYS_PER_JULIAN_CENTURY;

    let mean_longitude = (280.46646 + t * (36_000.76983 + t * 0.000_303_2)).rem_euclid(360.0);
    let mean_anomaly = (357.52911 + t * (35_999.05029 - 0.000_153_7 * t)).to_radians();
    let eccentricity = 0.016_708_634 - t * (0.000_042_037 + 0.000_000_126_7 * t);

    let equation_of_center = mean_anomaly.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
        + (2.0 * mean_anomaly).sin() * (0.019993 - 0.000101 * t)
        + (3.0 * mean_anomaly).sin() * 0.000289;

    let omega = (125.04 - 1_934.136 * t).to_radians();
    let apparent_longitude =
        (mean_longitude + equation_of_center - 0.00569 - 0.00478 * omega.sin()).to_radians();

    let mean_obliquity =
        23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0;
    let obliquity = (mean_obliquity + 0.00256 * omega.cos()).to_radians();

    let declination = (obliquity.sin() * apparent_longitude.sin()).asin();

    // Equation of time, in minutes.
    let l0 = mean_longitude.to_radians();
    let y = (obliquity / 2.0).tan().powi(2);
    let equation_of_time = 4.0
        * (y * (2.0 * l0).sin() - 2.0 * eccentricity * mean_anomaly.sin()
            + 4.0 * eccentricity * y * mean_anomaly.sin() * (2.0 * l0).cos()
            - 0.5 * y * y * (4.0 * l0).sin()
            - 1.25 * eccentricity * eccentricity * (2.0 * mean_anomaly).sin())
        .to_degrees();

    let utc_minutes = f64::from(at.num_seconds_from_midnight()) / 60.0;
    let true_solar_minutes =
        (utc_minutes + equation_of_time + 4.0 * longitude).rem_euclid(MINUTES_PER_DAY);
    let hour_angle = (true_solar_minutes / 4.0 - 180.0).to_radians();

    let latitude = latitude.to_radians();
    let cos_zenith = (latitude.sin() * declination.sin()
        + latitude.cos() * declination.cos() * hour_angle.cos())
    .clamp(-1.0, 1.0);

    90.0 - cos_zenith.acos().to_degrees()
}
