use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Secure storage unavailable: {0}")]
    SecureStorageUnavailable(String),

    #[error("Stored pairing token for {tv} is corrupted: {reason}")]
    TokenCorrupted { tv: String, reason: String },
}

pub type Result<T> = std::result::Result<T, AuthError>;
