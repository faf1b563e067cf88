use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Device unreachable: {0}")]
    Connectivity(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// True when the failure means the device could not be talked to at all,
    /// as opposed to the device rejecting a single request.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, BridgeError::Connectivity(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
