use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolarError {
    #[error("Latitude {0} is outside -90..=90")]
    InvalidLatitude(f64),

    #[error("Longitude {0} is outside -180..=180")]
    InvalidLongitude(f64),

    #[error("Unknown timezone '{0}' (expected an IANA name such as America/New_York)")]
    UnknownTimezone(String),

    #[error("Brightness {0} is outside the Art Mode scale 0..=10")]
    BrightnessOutOfScale(u8),

    #[error("Brightness range is inverted: min {min} > max {max}")]
    InvertedRange { min: u8, max: u8 },
}

pub type Result<T> = std::result::Result<T, SolarError>;
