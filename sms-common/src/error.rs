//! Common error types for the SMS receiver

use thiserror::Error;

/// Common result type for SMS receiver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by receiver front-ends
#[derive(Error, Debug)]
pub enum Error {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
