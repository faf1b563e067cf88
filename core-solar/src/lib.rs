//! # Solar Brightness
//!
//! Maps the sun's position at a place and time onto the Art Mode brightness
//! scale, so a Frame TV follows the daylight in the room.
//!
//! ## Model
//!
//! 1. Solar elevation from the NOAA solar position equations
//!    ([`solar_elevation`]).
//! 2. At or below the horizon the brightness is the range minimum.
//! 3. Above it, relative air mass from the Kasten–Young approximation
//!    ([`air_mass`]) feeds an irradiance proxy `0.7^(AM^0.678)`, normalized
//!    so the sun at the zenith reads `1.0` ([`relative_irradiance`]).
//! 4. The normalized irradiance is mapped linearly onto the configured
//!    [`BrightnessRange`], rounded and clamped.
//!
//! Everything here is a pure function of its inputs.
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use core_solar::{solar_brightness, BrightnessRange, Location};
//!
//! let boston = Location::new(42.3601, -71.0589, "America/New_York").unwrap();
//! let range = BrightnessRange::new(2, 10).unwrap();
//!
//! let midnight = Utc.with_ymd_and_hms(2024, 6, 21, 4, 0, 0).unwrap();
//! assert_eq!(solar_brightness(midnight, &boston, range), 2);
//! ```

pub mod brightness;
pub mod error;
pub mod position;
pub mod report;

pub use brightness::{
    air_mass, brightness, brightness_for_elevation, relative_irradiance, solar_brightness,
    BrightnessRange, Location, MAX_ART_BRIGHTNESS,
};
pub use error::{Result, SolarError};
pub use position::solar_elevation;
pub use report::{
    reference_days, render_configuration_error, render_report, ReferenceDay, CONFIGURATION_HELP,
};
