//! Matte (decorative border) vocabulary.
//!
//! A matte is written as `{style}_{color}` (for example `shadowbox_polar`) or
//! the literal `none`. Both halves must come from the fixed sets the TV
//! firmware understands; anything else is rejected when configuration is
//! loaded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every accepted value, in firmware order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation understood by the TV.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            fn lookup(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|candidate| candidate.as_str() == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Matte border style.
    MatteStyle {
        ModernThin => "modernthin",
        Modern => "modern",
        ModernWide => "modernwide",
        Flexible => "flexible",
        Shadowbox => "shadowbox",
        Panoramic => "panoramic",
        Triptych => "triptych",
        Mix => "mix",
        Squares => "squares",
    }
}

wire_enum! {
    /// Matte border color.
    MatteColor {
        Black => "black",
        Neutral => "neutral",
        Antique => "antique",
        Warm => "warm",
        Polar => "polar",
        Sand => "sand",
        Seafoam => "seafoam",
        Sage => "sage",
        Burgandy => "burgandy",
        Navy => "navy",
        Apricot => "apricot",
        Byzantine => "byzantine",
        Lavender => "lavender",
        RedOrange => "redorange",
        SkyBlue => "skyblue",
        Turqoise => "turqoise",
    }
}

/// Matte configuration applied to every upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Matte {
    /// No border.
    #[default]
    None,
    /// Border with a style and color.
    Styled { style: MatteStyle, color: MatteColor },
}

impl Matte {
    /// Value passed to the gateway on upload; `None` means "no matte".
    pub fn wire_id(&self) -> Option<String> {
        match self {
            Matte::None => None,
            Matte::Styled { .. } => Some(self.to_string()),
        }
    }
}

impl fmt::Display for Matte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matte::None => f.write_str("none"),
            Matte::Styled { style, color } => write!(f, "{}_{}", style, color),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid matte '{value}': {reason}")]
pub struct MatteParseError {
    pub value: String,
    pub reason: String,
}

impl MatteParseError {
    fn new(value: &str, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for Matte {
    type Err = MatteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();

        if normalized == "none" {
            return Ok(Matte::None);
        }

        let (style, color) = normalized
            .split_once('_')
            .ok_or_else(|| MatteParseError::new(s, "expected '{style}_{color}' or 'none'"))?;

        let style = MatteStyle::lookup(style).ok_or_else(|| {
            MatteParseError::new(
                s,
                format!("unknown style '{}' (expected one of: {})", style, join(MatteStyle::ALL)),
            )
        })?;

        let color = MatteColor::lookup(color).ok_or_else(|| {
            MatteParseError::new(
                s,
                format!("unknown color '{}' (expected one of: {})", color, join(MatteColor::ALL)),
            )
        })?;

        Ok(Matte::Styled { style, color })
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_styled_matte() {
        let matte: Matte = "shadowbox_polar".parse().unwrap();
        assert_eq!(
            matte,
            Matte::Styled {
                style: MatteStyle::Shadowbox,
                color: MatteColor::Polar,
            }
        );
        assert_eq!(matte.wire_id(), Some("shadowbox_polar".to_string()));
    }

    #[test]
    fn test_parse_none() {
        assert_eq!("none".parse::<Matte>().unwrap(), Matte::None);
        assert_eq!(" NONE ".parse::<Matte>().unwrap(), Matte::None);
        assert_eq!(Matte::None.wire_id(), None);
    }

    #[test]
    fn test_rejects_unknown_style() {
        let err = "bogus_color".parse::<Matte>().unwrap_err();
        assert_eq!(err.value, "bogus_color");
        assert!(err.reason.contains("unknown style 'bogus'"));
    }

    #[test]
    fn test_rejects_unknown_color() {
        let err = "modern_plaid".parse::<Matte>().unwrap_err();
        assert!(err.reason.contains("unknown color 'plaid'"));
    }

    #[test]
    fn test_rejects_missing_separator() {
        assert!("shadowbox".parse::<Matte>().is_err());
        assert!("".parse::<Matte>().is_err());
    }

    #[test]
    fn test_display_round_trips_every_style() {
        for style in MatteStyle::ALL {
            let matte = Matte::Styled {
                style: *style,
                color: MatteColor::Black,
            };
            assert_eq!(matte.to_string().parse::<Matte>().unwrap(), matte);
        }
    }
}
