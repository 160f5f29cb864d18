//! Error types for the telemetry engine.

use thiserror::Error;

/// Errors returned synchronously by engine operations and configuration.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller supplied a value the engine refuses to act on
    /// (empty notification message, zero interval, probability outside [0, 1]).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A simulated upload failed validation.
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    /// Configuration file could not be read or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, EngineError>;
