//! Device Gateway Abstraction
//!
//! Contract between the sync core and whatever speaks the TV's Art Mode
//! protocol. The core never sees sockets, pairing handshakes or wire
//! messages; it sees an [`ArtConnector`] that opens an [`ArtSession`] per TV.
//!
//! # Error contract
//!
//! Implementations must report "could not talk to the TV" as
//! [`BridgeError::Connectivity`](crate::error::BridgeError::Connectivity) and
//! "the TV rejected this one request" as
//! [`BridgeError::OperationFailed`](crate::error::BridgeError::OperationFailed).
//! The core skips the TV for the cycle on the former and skips only the item
//! on the latter.
//!
//! # Example
//!
//! ```ignore
//! use bridge_traits::art::{ArtConnector, TvAddress};
//!
//! async fn count_art(connector: &dyn ArtConnector, tokens: Arc<dyn PairingTokenStore>) -> Result<usize> {
//!     let address = TvAddress::parse("192.168.1.20")?;
//!     let session = connector.connect(&address, tokens).await?;
//!     let art = session.list_remote_art().await?;
//!     session.close().await.ok();
//!     Ok(art.len())
//! }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::error::Result;
use crate::matte::Matte;

/// Category holding user-uploaded pictures ("My Photos").
pub const USER_ART_CATEGORY: &str = "MY-C0002";

// ============================================================================
// Addresses
// ============================================================================

/// Network address of a TV (IP address or host name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TvAddress(String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid TV address '{0}'")]
pub struct AddressParseError(pub String);

impl TvAddress {
    /// Parse a configured address, rejecting empty values and values that
    /// cannot be a host (whitespace, path or scheme separators).
    pub fn parse(value: &str) -> std::result::Result<Self, AddressParseError> {
        let trimmed = value.trim();
        let invalid = trimmed.is_empty()
            || trimmed
                .chars()
                .any(|c| c.is_whitespace() || c == '/' || c == '\\' || c == '@');

        if invalid {
            return Err(AddressParseError(value.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem/key-safe identifier, e.g. `tv_192_168_1_20`.
    ///
    /// Not one-to-one: `10.0.0.2` and `10_0_0_2` map to the same key. Callers
    /// that store per-TV files must reject such pairs up front.
    pub fn storage_key(&self) -> String {
        let sanitized: String = self
            .0
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("tv_{}", sanitized)
    }
}

impl fmt::Display for TvAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TvAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Artwork
// ============================================================================

/// Artwork entry as reported by the TV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArtwork {
    /// Identifier assigned by the TV on upload
    pub content_id: String,
    /// Matte currently applied, if the TV reports one
    pub matte: Option<String>,
}

/// Image encoding accepted by the TV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Detect the format from a file extension (`.jpg`, `.jpeg`, `.png`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    /// File type string sent with an upload.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

/// A picture ready to be sent to a TV.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub format: ImageFormat,
    pub bytes: Bytes,
}

// ============================================================================
// Slideshow
// ============================================================================

/// Order in which the TV cycles through the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideshowKind {
    Shuffle,
    Sequential,
}

impl SlideshowKind {
    /// Wire value used by the TV firmware.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideshowKind::Shuffle => "shuffleslideshow",
            SlideshowKind::Sequential => "slideshow",
        }
    }
}

impl fmt::Display for SlideshowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideshowKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shuffle" | "shuffleslideshow" => Ok(SlideshowKind::Shuffle),
            "sequential" | "slideshow" => Ok(SlideshowKind::Sequential),
            other => Err(format!(
                "Invalid slideshow type '{}' (expected shuffle or sequential)",
                other
            )),
        }
    }
}

/// Slideshow state of a TV's Art Mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideshowSettings {
    pub enabled: bool,
    /// Minutes between pictures
    pub interval_minutes: u32,
    pub kind: SlideshowKind,
    pub category_id: String,
}

impl SlideshowSettings {
    /// Settings with the slideshow switched off, keeping the other fields.
    pub fn disabled(self) -> Self {
        Self {
            enabled: false,
            ..self
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Durable per-TV storage for pairing tokens issued by the TV.
#[async_trait]
pub trait PairingTokenStore: Send + Sync {
    /// Token previously issued by the TV at `address`, if any.
    async fn load_token(&self, address: &TvAddress) -> Result<Option<String>>;

    /// Persist a token issued by the TV at `address`.
    async fn save_token(&self, address: &TvAddress, token: &str) -> Result<()>;
}

/// Opens sessions to TVs.
#[async_trait]
pub trait ArtConnector: Send + Sync {
    /// Cheap reachability check that never fails; `false` means "skip".
    async fn is_reachable(&self, address: &TvAddress) -> bool;

    /// Open an Art Mode session, pairing through `tokens` when needed.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Connectivity`](crate::error::BridgeError::Connectivity)
    /// when the TV is off, unreachable, or refuses the pairing.
    async fn connect(
        &self,
        address: &TvAddress,
        tokens: Arc<dyn PairingTokenStore>,
    ) -> Result<Box<dyn ArtSession>>;
}

/// An open Art Mode session with a single TV.
#[async_trait]
pub trait ArtSession: Send + Sync {
    /// List user-uploaded artwork ([`USER_ART_CATEGORY`]).
    async fn list_remote_art(&self) -> Result<Vec<RemoteArtwork>>;

    /// Upload a picture and return the content id assigned by the TV.
    async fn upload(&self, image: ImageUpload, matte: Matte) -> Result<String>;

    /// Delete a previously uploaded picture.
    async fn delete(&self, content_id: &str) -> Result<()>;

    /// Show the given picture now.
    async fn select_art(&self, content_id: &str) -> Result<()>;

    async fn get_slideshow_settings(&self) -> Result<SlideshowSettings>;

    async fn set_slideshow_settings(&self, settings: &SlideshowSettings) -> Result<()>;

    /// Set Art Mode brightness (0-10).
    async fn set_brightness(&self, value: u8) -> Result<()>;

    /// Release the session.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
