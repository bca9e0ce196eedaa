//! Error types for kinergy.
//!
//! The simulation itself has no fatal error conditions: malformed physical
//! parameters are clamped, numerical degeneracies are flattened to zero, and
//! a missing render sink only skips the visual side effect of one tick. The
//! errors below cover the ambient surface instead: config files, YAML
//! parsing, schema validation, and driver misuse.

use thiserror::Error;

/// Result type alias for kinergy operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all kinergy operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration value that cannot be clamped into shape
    /// (e.g. an unknown scenario tag in a config file).
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Schema validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Scenario-level misuse of the engine API.
    #[error("Scenario error: {0}")]
    Scenario(String),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a scenario error.
    #[must_use]
    pub fn scenario(message: impl Into<String>) -> Self {
        Self::Scenario(message.into())
    }
}
