//! Error types for ranstress

use thiserror::Error;

/// Result type alias for ranstress operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ranstress
#[derive(Error, Debug)]
pub enum Error {
    /// Network I/O error
    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid attack configuration, surfaced before any worker starts
    #[error("Invalid configuration '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Payload template too short for its randomized field offsets
    #[error("Invalid payload template: {0}")]
    InvalidTemplate(String),

    /// Requested attack profile does not exist
    #[error("Unknown attack profile '{0}'")]
    UnknownProfile(String),

    /// Execution failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Report serialization or persistence error
    #[error("Report error: {0}")]
    Report(String),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Create an invalid template error
    pub fn invalid_template<S: Into<String>>(msg: S) -> Self {
        Error::InvalidTemplate(msg.into())
    }
}
