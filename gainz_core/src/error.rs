//! Error types for the gainz_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for gainz_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Submission rejected before reaching the service (bad duration, no exercises)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The workout service failed a persist or refetch call
    #[error("Service error: {0}")]
    Service(String),

    /// Local ledger state error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether re-invoking the same submission with the same payload makes sense.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Service(_))
    }
}
