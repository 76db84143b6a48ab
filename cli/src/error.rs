//! Error types for the terminal host.
//!
//! - [`ConfigError`] - Bad environment or flag values
//! - [`CliError`] - Everything a command can fail with

use thiserror::Error;

use momentum_wizard::{DefinitionError, TransportError, WizardError};

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    /// The base URL is not an absolute http(s) URL.
    #[error("Invalid base URL: '{0}'")]
    InvalidBaseUrl(String),
}

// =============================================================================
// Command Errors (top-level)
// =============================================================================

/// Top-level error of the `momentum` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;
