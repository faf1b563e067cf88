//! # Service Configuration
//!
//! Builds the validated [`FrameSyncConfig`] the service runs with.
//!
//! ## Overview
//!
//! Configuration comes from environment-style variables (see
//! [`FrameSyncConfig::from_env`]) or from the builder. Either way every value
//! is checked once at startup; an invalid matte, an empty TV list or an
//! incomplete solar location is a fatal [`Error::Config`] before the first
//! cycle runs. Nothing here is re-validated per cycle.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{FrameSyncConfig, ProcessEnv};
//!
//! let config = FrameSyncConfig::from_env(&ProcessEnv)?;
//! ```
//!
//! ```
//! use core_runtime::config::FrameSyncConfig;
//! use bridge_traits::art::TvAddress;
//!
//! let config = FrameSyncConfig::builder()
//!     .tv(TvAddress::parse("192.168.1.20").unwrap())
//!     .artwork_dir("/srv/artwork")
//!     .sync_interval_minutes(10)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.sync_interval.as_secs(), 600);
//! ```
//!
//! ## Slideshow and brightness
//!
//! Slideshow variables left unset mean "preserve": the TV's own settings are
//! captured before a mutating sync and restored afterwards. Setting any of
//! them switches to override mode, where unset fields fall back to
//! [`DEFAULT_SLIDESHOW_ENABLED`], [`DEFAULT_SLIDESHOW_INTERVAL_MINUTES`] and
//! [`DEFAULT_SLIDESHOW_KIND`].
//!
//! Solar brightness takes precedence over a manual `BRIGHTNESS` value.

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LoggingConfig};
use bridge_traits::art::{SlideshowKind, SlideshowSettings, TvAddress, USER_ART_CATEGORY};
use bridge_traits::matte::Matte;
use bridge_traits::time::LogLevel;
use core_solar::{BrightnessRange, Location, MAX_ART_BRIGHTNESS};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ARTWORK_DIR: &str = "/artwork";
pub const DEFAULT_TOKEN_DIR: &str = "/tokens";
pub const DEFAULT_SYNC_INTERVAL_MINUTES: u64 = 5;
pub const DEFAULT_TV_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_UPLOAD_DELAY_MS: u64 = 1_000;
pub const DEFAULT_DELETE_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEZONE: &str = "UTC";

pub const DEFAULT_SLIDESHOW_ENABLED: bool = true;
pub const DEFAULT_SLIDESHOW_INTERVAL_MINUTES: u32 = 15;
pub const DEFAULT_SLIDESHOW_KIND: SlideshowKind = SlideshowKind::Shuffle;

// ============================================================================
// Environment access
// ============================================================================

/// Source of configuration variables.
pub trait EnvSource {
    /// Raw value of `key`, if set.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Trimmed value of `key`; blank counts as unset.
fn read(env: &dyn EnvSource, key: &str) -> Option<String> {
    env.var(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T>(env: &dyn EnvSource, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    read(env, key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| Error::Config(format!("Invalid value for {}: '{}' ({})", key, raw, e)))
        })
        .transpose()
}

fn parse_bool(env: &dyn EnvSource, key: &str) -> Result<Option<bool>> {
    read(env, key)
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Config(format!(
                "Invalid value for {}: '{}' (expected true or false)",
                key, raw
            ))),
        })
        .transpose()
}

// ============================================================================
// Slideshow
// ============================================================================

/// Slideshow override fields; all `None` means preserve-on-change mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideshowOverride {
    pub enabled: Option<bool>,
    pub interval_minutes: Option<u32>,
    pub kind: Option<SlideshowKind>,
}

impl SlideshowOverride {
    pub fn is_set(&self) -> bool {
        self.enabled.is_some() || self.interval_minutes.is_some() || self.kind.is_some()
    }

    /// Settings to apply after a mutating sync, or `None` to restore the
    /// TV's captured settings instead.
    pub fn resolve(&self) -> Option<SlideshowSettings> {
        if !self.is_set() {
            return None;
        }

        Some(SlideshowSettings {
            enabled: self.enabled.unwrap_or(DEFAULT_SLIDESHOW_ENABLED),
            interval_minutes: self
                .interval_minutes
                .unwrap_or(DEFAULT_SLIDESHOW_INTERVAL_MINUTES),
            kind: self.kind.unwrap_or(DEFAULT_SLIDESHOW_KIND),
            category_id: USER_ART_CATEGORY.to_string(),
        })
    }

    fn from_env(env: &dyn EnvSource) -> Result<Self> {
        let interval_minutes = parse_var::<u32>(env, "SLIDESHOW_INTERVAL")?;
        if interval_minutes == Some(0) {
            return Err(Error::Config(
                "SLIDESHOW_INTERVAL must be at least 1 minute".to_string(),
            ));
        }

        Ok(Self {
            enabled: parse_bool(env, "SLIDESHOW_ENABLED")?,
            interval_minutes,
            kind: parse_var::<SlideshowKind>(env, "SLIDESHOW_TYPE")?,
        })
    }
}

// ============================================================================
// Brightness
// ============================================================================

/// Location and range driving the solar brightness curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarSettings {
    pub location: Location,
    pub range: BrightnessRange,
}

impl SolarSettings {
    /// Reads `LOCATION_*` and `BRIGHTNESS_MIN`/`BRIGHTNESS_MAX`.
    ///
    /// Used both by [`FrameSyncConfig::from_env`] and by the solar diagnostic,
    /// which does not need a TV list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when latitude or longitude is missing or any
    /// value is out of range.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self> {
        let latitude = parse_var::<f64>(env, "LOCATION_LATITUDE")?;
        let longitude = parse_var::<f64>(env, "LOCATION_LONGITUDE")?;
        let timezone = read(env, "LOCATION_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(Error::Config(
                "Solar brightness requires LOCATION_LATITUDE and LOCATION_LONGITUDE".to_string(),
            ));
        };

        let location = Location::new(latitude, longitude, &timezone)
            .map_err(|e| Error::Config(format!("Invalid location: {}", e)))?;

        Ok(Self {
            location,
            range: brightness_range_from_env(env)?,
        })
    }
}

fn brightness_range_from_env(env: &dyn EnvSource) -> Result<BrightnessRange> {
    let defaults = BrightnessRange::default();
    let min = parse_var::<u8>(env, "BRIGHTNESS_MIN")?.unwrap_or(defaults.min());
    let max = parse_var::<u8>(env, "BRIGHTNESS_MAX")?.unwrap_or(defaults.max());

    BrightnessRange::new(min, max)
        .map_err(|e| Error::Config(format!("Invalid BRIGHTNESS_MIN/BRIGHTNESS_MAX: {}", e)))
}

/// Brightness policy. Solar wins when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BrightnessConfig {
    pub manual: Option<u8>,
    pub solar: Option<SolarSettings>,
}

impl BrightnessConfig {
    pub fn is_configured(&self) -> bool {
        self.manual.is_some() || self.solar.is_some()
    }

    fn validate(&self) -> Result<()> {
        if let Some(value) = self.manual {
            if value > MAX_ART_BRIGHTNESS {
                return Err(Error::Config(format!(
                    "BRIGHTNESS must be between 0 and {}, got {}",
                    MAX_ART_BRIGHTNESS, value
                )));
            }
        }
        Ok(())
    }

    fn from_env(env: &dyn EnvSource) -> Result<Self> {
        let manual = parse_var::<u8>(env, "BRIGHTNESS")?;
        let solar_enabled = parse_bool(env, "SOLAR_BRIGHTNESS_ENABLED")?.unwrap_or(false);

        let solar = if solar_enabled {
            Some(SolarSettings::from_env(env)?)
        } else {
            // Still reject a bad range so typos surface before solar is switched on.
            brightness_range_from_env(env)?;
            None
        };

        let config = Self { manual, solar };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Logging settings from `LOG_LEVEL`, `LOG_FORMAT` and `LOG_FILTER`.
pub fn logging_from_env(env: &dyn EnvSource) -> Result<LoggingConfig> {
    let mut config = LoggingConfig::default();

    if let Some(level) = parse_var::<LogLevel>(env, "LOG_LEVEL")? {
        config = config.with_level(level);
    }
    if let Some(format) = parse_var::<LogFormat>(env, "LOG_FORMAT")? {
        config = config.with_format(format);
    }
    if let Some(filter) = read(env, "LOG_FILTER") {
        config = config.with_filter(filter);
    }

    Ok(config)
}

// ============================================================================
// FrameSyncConfig
// ============================================================================

/// Validated service configuration.
#[derive(Debug, Clone)]
pub struct FrameSyncConfig {
    /// TVs to keep in sync, in configured order, without duplicates
    pub tvs: Vec<TvAddress>,
    /// Source folder of artwork
    pub artwork_dir: PathBuf,
    /// Pairing tokens and per-TV record sets
    pub token_dir: PathBuf,
    /// Pause between the end of one cycle and the start of the next
    pub sync_interval: Duration,
    /// Matte applied to every upload
    pub matte: Matte,
    pub slideshow: SlideshowOverride,
    pub brightness: BrightnessConfig,
    /// Upper bound on any single gateway call
    pub tv_timeout: Duration,
    /// Pause between consecutive uploads to one TV
    pub upload_delay: Duration,
    /// Pause between consecutive deletes on one TV
    pub delete_delay: Duration,
    pub logging: LoggingConfig,
}

impl FrameSyncConfig {
    pub fn builder() -> FrameSyncConfigBuilder {
        FrameSyncConfigBuilder::default()
    }

    /// Load from environment-style variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending variable.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self> {
        let tvs = parse_tv_list(&read(env, "TV_IPS").unwrap_or_default())?;

        let matte = match read(env, "MATTE_STYLE") {
            Some(raw) => raw
                .parse::<Matte>()
                .map_err(|e| Error::Config(format!("MATTE_STYLE: {}", e)))?,
            None => Matte::None,
        };

        let mut builder = Self::builder()
            .tvs(tvs)
            .matte(matte)
            .slideshow(SlideshowOverride::from_env(env)?)
            .brightness(BrightnessConfig::from_env(env)?)
            .logging(logging_from_env(env)?);

        if let Some(dir) = read(env, "ARTWORK_DIR") {
            builder = builder.artwork_dir(dir);
        }
        if let Some(dir) = read(env, "TOKEN_DIR") {
            builder = builder.token_dir(dir);
        }
        if let Some(minutes) = parse_var::<u64>(env, "SYNC_INTERVAL_MINUTES")? {
            builder = builder.sync_interval_minutes(minutes);
        }
        if let Some(seconds) = parse_var::<u64>(env, "TV_TIMEOUT_SECONDS")? {
            builder = builder.tv_timeout(Duration::from_secs(seconds));
        }
        if let Some(ms) = parse_var::<u64>(env, "UPLOAD_DELAY_MS")? {
            builder = builder.upload_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = parse_var::<u64>(env, "DELETE_DELAY_MS")? {
            builder = builder.delete_delay(Duration::from_millis(ms));
        }

        builder.build()
    }

    /// Checks invariants the builder cannot express in types.
    pub fn validate(&self) -> Result<()> {
        if self.tvs.is_empty() {
            return Err(Error::Config(
                "At least one TV address is required. Set TV_IPS to a comma-separated list."
                    .to_string(),
            ));
        }

        let mut keys: HashMap<String, &TvAddress> = HashMap::with_capacity(self.tvs.len());
        for tv in &self.tvs {
            if let Some(other) = keys.insert(tv.storage_key(), tv) {
                return Err(Error::Config(format!(
                    "TV addresses '{}' and '{}' would share token and record files; \
                     list each TV once in TV_IPS",
                    other, tv
                )));
            }
        }

        if self.sync_interval < Duration::from_secs(60) {
            return Err(Error::Config(
                "SYNC_INTERVAL_MINUTES must be at least 1".to_string(),
            ));
        }

        if self.tv_timeout.is_zero() {
            return Err(Error::Config(
                "TV_TIMEOUT_SECONDS must be at least 1".to_string(),
            ));
        }

        if self.artwork_dir.as_os_str().is_empty() {
            return Err(Error::Config("ARTWORK_DIR cannot be empty".to_string()));
        }

        if self.token_dir.as_os_str().is_empty() {
            return Err(Error::Config("TOKEN_DIR cannot be empty".to_string()));
        }

        self.brightness.validate()
    }
}

impl fmt::Display for FrameSyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tvs: Vec<&str> = self.tvs.iter().map(TvAddress::as_str).collect();
        writeln!(f, "TVs:              {}", tvs.join(", "))?;
        writeln!(f, "Artwork dir:      {}", self.artwork_dir.display())?;
        writeln!(f, "Token dir:        {}", self.token_dir.display())?;
        writeln!(
            f,
            "Sync interval:    {} min",
            self.sync_interval.as_secs() / 60
        )?;
        writeln!(f, "Matte:            {}", self.matte)?;

        match self.slideshow.resolve() {
            Some(settings) => writeln!(
                f,
                "Slideshow:        override (enabled={}, interval={} min, type={})",
                settings.enabled, settings.interval_minutes, settings.kind
            )?,
            None => writeln!(f, "Slideshow:        preserve TV settings")?,
        }

        match (&self.brightness.solar, self.brightness.manual) {
            (Some(solar), _) => writeln!(
                f,
                "Brightness:       solar ({}, {} {}, range {}..={})",
                solar.location.latitude(),
                solar.location.longitude(),
                solar.location.timezone().name(),
                solar.range.min(),
                solar.range.max()
            )?,
            (None, Some(value)) => writeln!(f, "Brightness:       manual {}", value)?,
            (None, None) => writeln!(f, "Brightness:       unchanged")?,
        }

        writeln!(f, "TV timeout:       {} s", self.tv_timeout.as_secs())?;
        writeln!(
            f,
            "Upload delay:     {} ms",
            self.upload_delay.as_millis()
        )?;
        writeln!(
            f,
            "Delete delay:     {} ms",
            self.delete_delay.as_millis()
        )?;
        write!(
            f,
            "Logging:          {} ({})",
            self.logging.level, self.logging.format
        )
    }
}

/// Comma-separated TV list; blanks skipped, duplicates dropped (first wins).
fn parse_tv_list(raw: &str) -> Result<Vec<TvAddress>> {
    let mut tvs: Vec<TvAddress> = Vec::new();

    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let address = TvAddress::parse(part)
            .map_err(|e| Error::Config(format!("TV_IPS: {}", e)))?;
        if !tvs.contains(&address) {
            tvs.push(address);
        }
    }

    Ok(tvs)
}

/// Builder for [`FrameSyncConfig`].
#[derive(Debug, Default)]
pub struct FrameSyncConfigBuilder {
    tvs: Vec<TvAddress>,
    artwork_dir: Option<PathBuf>,
    token_dir: Option<PathBuf>,
    sync_interval: Option<Duration>,
    matte: Matte,
    slideshow: SlideshowOverride,
    brightness: BrightnessConfig,
    tv_timeout: Option<Duration>,
    upload_delay: Option<Duration>,
    delete_delay: Option<Duration>,
    logging: Option<LoggingConfig>,
}

impl FrameSyncConfigBuilder {
    /// Add one TV.
    pub fn tv(mut self, address: TvAddress) -> Self {
        self.tvs.push(address);
        self
    }

    /// Replace the TV list.
    pub fn tvs(mut self, addresses: Vec<TvAddress>) -> Self {
        self.tvs = addresses;
        self
    }

    pub fn artwork_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artwork_dir = Some(path.into());
        self
    }

    pub fn token_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.token_dir = Some(path.into());
        self
    }

    pub fn sync_interval_minutes(mut self, minutes: u64) -> Self {
        self.sync_interval = Some(Duration::from_secs(minutes.saturating_mul(60)));
        self
    }

    pub fn matte(mut self, matte: Matte) -> Self {
        self.matte = matte;
        self
    }

    pub fn slideshow(mut self, slideshow: SlideshowOverride) -> Self {
        self.slideshow = slideshow;
        self
    }

    pub fn brightness(mut self, brightness: BrightnessConfig) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn tv_timeout(mut self, timeout: Duration) -> Self {
        self.tv_timeout = Some(timeout);
        self
    }

    pub fn upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    pub fn delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = Some(delay);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no TV is configured or a value is out of
    /// range.
    pub fn build(self) -> Result<FrameSyncConfig> {
        let mut tvs: Vec<TvAddress> = Vec::with_capacity(self.tvs.len());
        for address in self.tvs {
            if !tvs.contains(&address) {
                tvs.push(address);
            }
        }

        let config = FrameSyncConfig {
            tvs,
            artwork_dir: self
                .artwork_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTWORK_DIR)),
            token_dir: self
                .token_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_DIR)),
            sync_interval: self
                .sync_interval
                .unwrap_or(Duration::from_secs(DEFAULT_SYNC_INTERVAL_MINUTES * 60)),
            matte: self.matte,
            slideshow: self.slideshow,
            brightness: self.brightness,
            tv_timeout: self
                .tv_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TV_TIMEOUT_SECONDS)),
            upload_delay: self
                .upload_delay
                .unwrap_or(Duration::from_millis(DEFAULT_UPLOAD_DELAY_MS)),
            delete_delay: self
                .delete_delay
                .unwrap_or(Duration::from_millis(DEFAULT_DELETE_DELAY_MS)),
            logging: self.logging.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::matte::{MatteColor, MatteStyle};

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn tv(addr: &str) -> TvAddress {
        TvAddress::parse(addr).unwrap()
    }

    #[test]
    fn test_defaults_from_minimal_env() {
        let config = FrameSyncConfig::from_env(&env(&[("TV_IPS", "192.168.1.20")])).unwrap();

        assert_eq!(config.tvs, vec![tv("192.168.1.20")]);
        assert_eq!(config.artwork_dir, PathBuf::from("/artwork"));
        assert_eq!(config.token_dir, PathBuf::from("/tokens"));
        assert_eq!(config.sync_interval, Duration::from_secs(300));
        assert_eq!(config.matte, Matte::None);
        assert!(!config.slideshow.is_set());
        assert!(!config.brightness.is_configured());
        assert_eq!(config.tv_timeout, Duration::from_secs(10));
        assert_eq!(config.upload_delay, Duration::from_millis(1000));
        assert_eq!(config.delete_delay, Duration::from_millis(500));
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_tv_list_trims_skips_blanks_and_dedupes() {
        let config = FrameSyncConfig::from_env(&env(&[(
            "TV_IPS",
            " 10.0.0.2, ,10.0.0.3,10.0.0.2,",
        )]))
        .unwrap();

        assert_eq!(config.tvs, vec![tv("10.0.0.2"), tv("10.0.0.3")]);
    }

    #[test]
    fn test_missing_tv_list_is_fatal() {
        let err = FrameSyncConfig::from_env(&env(&[])).unwrap_err();
        assert!(err.to_string().contains("TV_IPS"));

        let err = FrameSyncConfig::from_env(&env(&[("TV_IPS", " , ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_matte_validation_at_startup() {
        let config = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("MATTE_STYLE", "shadowbox_polar"),
        ]))
        .unwrap();
        assert_eq!(
            config.matte,
            Matte::Styled {
                style: MatteStyle::Shadowbox,
                color: MatteColor::Polar
            }
        );

        let err = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("MATTE_STYLE", "bogus_color"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MATTE_STYLE"));
    }

    #[test]
    fn test_interval_must_be_positive() {
        let err = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("SYNC_INTERVAL_MINUTES", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SYNC_INTERVAL_MINUTES"));

        let err = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("SYNC_INTERVAL_MINUTES", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("Invalid value for SYNC_INTERVAL_MINUTES"));
    }

    #[test]
    fn test_slideshow_preserve_mode() {
        let overrides = SlideshowOverride::default();
        assert_eq!(overrides.resolve(), None);
    }

    #[test]
    fn test_slideshow_override_merges_defaults() {
        let config = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("SLIDESHOW_INTERVAL", "30"),
        ]))
        .unwrap();

        assert_eq!(
            config.slideshow.resolve(),
            Some(SlideshowSettings {
                enabled: true,
                interval_minutes: 30,
                kind: SlideshowKind::Shuffle,
                category_id: "MY-C0002".to_string(),
            })
        );

        let config = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("SLIDESHOW_ENABLED", "off"),
            ("SLIDESHOW_TYPE", "sequential"),
        ]))
        .unwrap();
        let resolved = config.slideshow.resolve().unwrap();
        assert!(!resolved.enabled);
        assert_eq!(resolved.interval_minutes, 15);
        assert_eq!(resolved.kind, SlideshowKind::Sequential);
    }

    #[test]
    fn test_slideshow_rejects_bad_values() {
        for (key, value) in [
            ("SLIDESHOW_ENABLED", "maybe"),
            ("SLIDESHOW_INTERVAL", "0"),
            ("SLIDESHOW_TYPE", "random"),
        ] {
            let result = FrameSyncConfig::from_env(&env(&[("TV_IPS", "10.0.0.2"), (key, value)]));
            assert!(result.is_err(), "{key}={value} should be rejected");
        }
    }

    #[test]
    fn test_manual_brightness() {
        let config = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("BRIGHTNESS", "7"),
        ]))
        .unwrap();
        assert_eq!(config.brightness.manual, Some(7));
        assert!(config.brightness.solar.is_none());

        assert!(FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("BRIGHTNESS", "11"),
        ]))
        .is_err());
    }

    #[test]
    fn test_solar_requires_location() {
        let err = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("SOLAR_BRIGHTNESS_ENABLED", "true"),
            ("LOCATION_LATITUDE", "42.3601"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LOCATION_LONGITUDE"));

        let err = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("SOLAR_BRIGHTNESS_ENABLED", "true"),
            ("LOCATION_LATITUDE", "142"),
            ("LOCATION_LONGITUDE", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("Invalid location"));
    }

    #[test]
    fn test_solar_and_manual_both_kept() {
        let config = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("BRIGHTNESS", "4"),
            ("SOLAR_BRIGHTNESS_ENABLED", "yes"),
            ("LOCATION_LATITUDE", "42.3601"),
            ("LOCATION_LONGITUDE", "-71.0589"),
            ("LOCATION_TIMEZONE", "America/New_York"),
            ("BRIGHTNESS_MIN", "1"),
            ("BRIGHTNESS_MAX", "9"),
        ]))
        .unwrap();

        let solar = config.brightness.solar.unwrap();
        assert_eq!(config.brightness.manual, Some(4));
        assert_eq!(solar.range, BrightnessRange::new(1, 9).unwrap());
        assert_eq!(solar.location.timezone().name(), "America/New_York");
    }

    #[test]
    fn test_inverted_range_rejected_even_without_solar() {
        let err = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2"),
            ("BRIGHTNESS_MIN", "9"),
            ("BRIGHTNESS_MAX", "3"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("BRIGHTNESS_MIN"));
    }

    #[test]
    fn test_logging_from_env() {
        let logging = logging_from_env(&env(&[
            ("LOG_LEVEL", "DEBUG"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(logging.level, LogLevel::Debug);
        assert_eq!(logging.format, LogFormat::Json);

        assert!(logging_from_env(&env(&[("LOG_LEVEL", "chatty")])).is_err());
    }

    #[test]
    fn test_builder_requires_tv() {
        let err = FrameSyncConfig::builder().build().unwrap_err();
        assert!(err.to_string().contains("At least one TV address"));
    }

    #[test]
    fn test_builder_dedupes_and_keeps_order() {
        let config = FrameSyncConfig::builder()
            .tv(tv("10.0.0.3"))
            .tv(tv("10.0.0.2"))
            .tv(tv("10.0.0.3"))
            .build()
            .unwrap();
        assert_eq!(config.tvs, vec![tv("10.0.0.3"), tv("10.0.0.2")]);
    }

    #[test]
    fn test_addresses_sharing_storage_files_are_rejected() {
        let err = FrameSyncConfig::from_env(&env(&[("TV_IPS", "10.0.0.2,10_0_0_2")]))
            .unwrap_err();
        assert!(err.to_string().contains("'10.0.0.2' and '10_0_0_2'"));

        let err = FrameSyncConfig::builder()
            .tv(tv("10.0.0.2:8002"))
            .tv(tv("10.0.0.2_8002"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("TV_IPS"));
    }

    #[test]
    fn test_display_lists_resolved_settings() {
        let config = FrameSyncConfig::from_env(&env(&[
            ("TV_IPS", "10.0.0.2,10.0.0.3"),
            ("BRIGHTNESS", "6"),
        ]))
        .unwrap();
        let text = config.to_string();
        assert!(text.contains("10.0.0.2, 10.0.0.3"));
        assert!(text.contains("preserve TV settings"));
        assert!(text.contains("manual 6"));
    }
}
