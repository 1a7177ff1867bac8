//! Error types for the `trs` binary.

use thiserror::Error;
use trs_core::{TrsError, ValidationError};

use crate::config::ConfigError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resolution or pricing failed
    #[error("Pricing error: {0}")]
    Pricing(#[from] TrsError),

    /// Invalid simulation or decision settings
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Trade request file could not be read or parsed
    #[error("Request error: {0}")]
    Request(String),

    /// JSON serialisation failed
    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a request error
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }
}

/// Result alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
