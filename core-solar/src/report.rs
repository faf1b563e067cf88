//! Text report for the solar brightness diagnostic.
//!
//! Prints the predicted brightness for every local hour of three reference
//! days so a user can check their location settings before letting the
//! service drive a TV.

use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use std::fmt::Write;

use crate::brightness::{brightness_for_elevation, BrightnessRange, Location};
use crate::position::solar_elevation;

const RULE_WIDTH: usize = 80;
const BAR_WIDTH: f64 = 40.0;

/// Variables the diagnostic needs, with examples.
pub const CONFIGURATION_HELP: &str = "\
Please set the following environment variables:
  LOCATION_LATITUDE    (e.g., 42.3601)
  LOCATION_LONGITUDE   (e.g., -71.0589)
  LOCATION_TIMEZONE    (e.g., America/New_York)

Optional:
  BRIGHTNESS_MIN       (default: 2)
  BRIGHTNESS_MAX       (default: 10)

Example:
  export LOCATION_LATITUDE=42.3601
  export LOCATION_LONGITUDE=-71.0589
  export LOCATION_TIMEZONE=America/New_York
  frame-sync --test-solar";

/// A day the report samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceDay {
    pub name: &'static str,
    pub month: u32,
    pub day: u32,
}

/// Equinox and solstices, named so they read correctly in both hemispheres.
pub fn reference_days() -> [ReferenceDay; 3] {
    [
        ReferenceDay {
            name: "March Equinox",
            month: 3,
            day: 20,
        },
        ReferenceDay {
            name: "June Solstice",
            month: 6,
            day: 21,
        },
        ReferenceDay {
            name: "December Solstice",
            month: 12,
            day: 21,
        },
    ]
}

/// Full report for `year`: one table per reference day and a closing
/// summary of the method.
pub fn render_report(year: i32, location: &Location, range: BrightnessRange) -> String {
    let mut out = String::new();

    for day in reference_days() {
        render_day(&mut out, year, day, location, range);
    }

    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Calculation Method:");
    let _ = writeln!(out, "  - Sun below horizon (<=0°): brightness = BRIGHTNESS_MIN");
    let _ = writeln!(out, "  - Above horizon: clear-sky atmospheric air mass model");
    let _ = writeln!(
        out,
        "    • Air Mass = 1 / (sin(elev) + 0.50572×(elev+6.07995)^-1.6364) [Kasten-Young]"
    );
    let _ = writeln!(
        out,
        "    • Relative Irradiance = 0.7^(AM^0.678) / 0.7, clamped to 0..1"
    );
    let _ = writeln!(
        out,
        "    • Brightness = MIN + (MAX - MIN) × Relative Irradiance, rounded"
    );
    let _ = writeln!(out, "  - Solar elevation: NOAA solar position equations");
    let _ = writeln!(out, "{}", rule);

    out
}

/// Error banner followed by [`CONFIGURATION_HELP`].
pub fn render_configuration_error(message: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!(
        "\n{rule}\nERROR: {message}\n{rule}\n\n{help}\n\n{rule}\n",
        rule = rule,
        message = message,
        help = CONFIGURATION_HELP
    )
}

fn render_day(
    out: &mut String,
    year: i32,
    day: ReferenceDay,
    location: &Location,
    range: BrightnessRange,
) {
    let Some(date) = NaiveDate::from_ymd_opt(year, day.month, day.day) else {
        return;
    };
    let tz = location.timezone();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "{} - {}/{:02}/{:02}",
        day.name,
        date.year(),
        date.month(),
        date.day()
    );
    let _ = writeln!(
        out,
        "Location: {}°, {}° ({})",
        location.latitude(),
        location.longitude(),
        tz.name()
    );
    let _ = writeln!(
        out,
        "Brightness range: {} (min) to {} (max)",
        range.min(),
        range.max()
    );
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "{:<12} {:<20} {:<15} Visual",
        "Time", "Sun Elevation", "Brightness"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for hour in 0..24 {
        // Hours skipped by a DST transition have no local time.
        let Some(local) = tz
            .with_ymd_and_hms(year, day.month, day.day, hour, 0, 0)
            .earliest()
        else {
            continue;
        };

        let elevation = solar_elevation(local.with_timezone(&Utc), location.latitude(), location.longitude());
        let brightness = brightness_for_elevation(elevation, range);

        let elevation_label = if elevation < 0.0 {
            format!("{:6.2}° (below)", elevation)
        } else {
            format!("{:6.2}°", elevation)
        };

        let _ = writeln!(
            out,
            "{:<12} {:<20} {:<15} {}",
            local.format("%I:%M %p").to_string(),
            elevation_label,
            brightness,
            bar(brightness, range)
        );
    }
}

fn bar(brightness: u8, range: BrightnessRange) -> String {
    if range.max() <= range.min() {
        return String::new();
    }

    let fraction =
        f64::from(brightness - range.min()) / f64::from(range.max() - range.min());
    "█".repeat((fraction * BAR_WIDTH) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_forty() {
        let range = BrightnessRange::new(2, 10).unwrap();
        assert_eq!(bar(2, range), "");
        assert_eq!(bar(10, range).chars().count(), 40);
        assert_eq!(bar(8, range).chars().count(), 30);
    }

    #[test]
    fn test_bar_with_flat_range() {
        let range = BrightnessRange::new(6, 6).unwrap();
        assert_eq!(bar(6, range), "");
    }

    #[test]
    fn test_error_banner_includes_help() {
        let text = render_configuration_error("LOCATION_LATITUDE is not set");
        assert!(text.contains("ERROR: LOCATION_LATITUDE is not set"));
        assert!(text.contains("LOCATION_TIMEZONE"));
        assert!(text.contains("frame-sync --test-solar"));
    }
}
