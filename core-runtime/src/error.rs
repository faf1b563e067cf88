use thiserror::Error;

/// Startup failures of the runtime layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing setting. Always fatal; the message names the
    /// variable to fix.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The process-wide facility could not be installed (e.g. a second
    /// global tracing subscriber).
    #[error("Runtime setup failed: {0}")]
    Internal(String),
}

impl Error {
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
