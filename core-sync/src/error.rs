use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("TV {tv} unreachable: {message}")]
    Connectivity { tv: String, message: String },

    #[error("{operation} timed out after {seconds} seconds")]
    Timeout { operation: String, seconds: u64 },

    #[error("Upload of {file} failed: {message}")]
    Upload { file: String, message: String },

    #[error("Delete of {remote_id} failed: {message}")]
    Delete { remote_id: String, message: String },

    #[error("Could not list remote artwork: {0}")]
    RemoteListing(String),

    #[error("Could not read slideshow settings: {0}")]
    Capture(String),

    #[error("Could not set {setting}: {message}")]
    SettingFailed { setting: String, message: String },

    #[error("State store error: {0}")]
    StateStore(String),

    #[error("Cannot scan artwork directory {path}: {message}")]
    LocalScan { path: String, message: String },
}

impl SyncError {
    /// True when the TV should be treated as unreachable for the rest of the
    /// cycle.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            SyncError::Connectivity { .. } | SyncError::Timeout { .. }
        )
    }

    /// Wrap a gateway error, keeping connectivity failures distinguishable.
    pub(crate) fn from_gateway(
        tv: &str,
        error: BridgeError,
        otherwise: impl FnOnce(String) -> SyncError,
    ) -> SyncError {
        if error.is_connectivity() {
            SyncError::Connectivity {
                tv: tv.to_string(),
                message: error.to_string(),
            }
        } else {
            otherwise(error.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
