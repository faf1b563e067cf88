use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration or runtime setup failure; the inner message is
    /// already prefixed.
    #[error(transparent)]
    Config(#[from] core_runtime::Error),

    #[error("Pairing error: {0}")]
    Auth(#[from] core_auth::AuthError),
}

impl CoreError {
    /// Errors that must stop the process before any cycle runs.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
