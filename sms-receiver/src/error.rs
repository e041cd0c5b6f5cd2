//! Error types for sms-receiver
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for sms-receiver
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors from the shared library (config discovery, TOML parsing)
    #[error(transparent)]
    Common(#[from] sms_common::Error),

    /// Renderer lacks a display region required on visual targets
    #[error("Cannot find display region: {0}")]
    MissingDisplayRegion(String),

    /// The receiver service task has exited
    #[error("Receiver service stopped")]
    ServiceStopped,

    /// Malformed inbound event
    #[error("Bad event: {0}")]
    BadEvent(#[from] serde_json::Error),
}

/// Convenience Result type using sms-receiver Error
pub type Result<T> = std::result::Result<T, Error>;
