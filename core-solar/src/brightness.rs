//! Elevation → brightness mapping.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::trace;

use crate::error::{Result, SolarError};
use crate::position::solar_elevation;

/// Top of the Art Mode brightness scale.
pub const MAX_ART_BRIGHTNESS: u8 = 10;

/// Transmittance of a clear atmosphere for one air mass.
const CLEAR_SKY_TRANSMITTANCE: f64 = 0.7;
/// Empirical exponent of the Meinel clear-sky model.
const AIR_MASS_EXPONENT: f64 = 0.678;

/// Observer location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    timezone: Tz,
}

impl Location {
    /// Validated location from degrees and an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns [`SolarError`] when a coordinate is out of range or the
    /// timezone name is unknown.
    pub fn new(latitude: f64, longitude: f64, timezone: &str) -> Result<Self> {
        let timezone = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| SolarError::UnknownTimezone(timezone.to_string()))?;
        Self::with_timezone(latitude, longitude, timezone)
    }

    pub fn with_timezone(latitude: f64, longitude: f64, timezone: Tz) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SolarError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SolarError::InvalidLongitude(longitude));
        }

        Ok(Self {
            latitude,
            longitude,
            timezone,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// Inclusive brightness bounds on the 0–10 Art Mode scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessRange {
    min: u8,
    max: u8,
}

impl BrightnessRange {
    pub fn new(min: u8, max: u8) -> Result<Self> {
        for value in [min, max] {
            if value > MAX_ART_BRIGHTNESS {
                return Err(SolarError::BrightnessOutOfScale(value));
            }
        }
        if min > max {
            return Err(SolarError::InvertedRange { min, max });
        }

        Ok(Self { min, max })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn clamp(&self, value: u8) -> u8 {
        value.clamp(self.min, self.max)
    }
}

impl Default for BrightnessRange {
    fn default() -> Self {
        Self { min: 2, max: 10 }
    }
}

/// Relative optical air mass (Kasten–Young, 1989) for an elevation in degrees.
///
/// About 1.0 at the zenith and roughly 38 at the horizon.
pub fn air_mass(elevation_degrees: f64) -> f64 {
    1.0 / (elevation_degrees.to_radians().sin()
        + 0.50572 * (elevation_degrees + 6.07995).powf(-1.6364))
}

/// Clear-sky irradiance relative to the sun at the zenith, in `[0, 1]`.
///
/// Zero at or below the horizon.
pub fn relative_irradiance(elevation_degrees: f64) -> f64 {
    if elevation_degrees <= 0.0 {
        return 0.0;
    }

    let am = air_mass(elevation_degrees);
    let irradiance = CLEAR_SKY_TRANSMITTANCE.powf(am.powf(AIR_MASS_EXPONENT));
    (irradiance / CLEAR_SKY_TRANSMITTANCE).clamp(0.0, 1.0)
}

/// Brightness for a given solar elevation.
pub fn brightness_for_elevation(elevation_degrees: f64, range: BrightnessRange) -> u8 {
    if elevation_degrees <= 0.0 {
        return range.min;
    }

    let span = f64::from(range.max - range.min);
    let value = f64::from(range.min) + span * relative_irradiance(elevation_degrees);
    let rounded = value.round().clamp(f64::from(range.min), f64::from(range.max));

    rounded as u8
}

/// Brightness for `at` as seen from `location`.
pub fn solar_brightness(at: DateTime<Utc>, location: &Location, range: BrightnessRange) -> u8 {
    let elevation = solar_elevation(at, location.latitude, location.longitude);
    let value = brightness_for_elevation(elevation, range);

    trace!(
        at = %at.with_timezone(&location.timezone),
        elevation,
        brightness = value,
        "Computed solar brightness"
    );

    value
}

/// Flat-argument form of [`solar_brightness`].
///
/// The timezone only affects how the instant is reported; the result depends
/// on the absolute instant.
pub fn brightness(
    timestamp: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    timezone: &str,
    min: u8,
    max: u8,
) -> Result<u8> {
    let location = Location::new(latitude, longitude, timezone)?;
    let range = BrightnessRange::new(min, max)?;
    Ok(solar_brightness(timestamp, &location, range))
}
