//! Slideshow and brightness decisions taken after a TV is reconciled.

use bridge_traits::art::SlideshowSettings;
use chrono::{DateTime, Utc};
use core_runtime::config::{BrightnessConfig, SlideshowOverride};
use core_solar::solar_brightness;

/// Settings to write back after a mutating sync.
///
/// An override always wins; otherwise the captured snapshot is restored
/// verbatim. `None` means nothing should be written.
pub fn slideshow_to_apply(
    overrides: &SlideshowOverride,
    captured: Option<&SlideshowSettings>,
) -> Option<SlideshowSettings> {
    overrides.resolve().or_else(|| captured.cloned())
}

/// Brightness to set at `now`, if any is configured. Solar wins over manual.
pub fn brightness_target(config: &BrightnessConfig, now: DateTime<Utc>) -> Option<u8> {
    match (&config.solar, config.manual) {
        (Some(solar), _) => Some(solar_brightness(now, &solar.location, solar.range)),
        (None, manual) => manual,
    }
}
