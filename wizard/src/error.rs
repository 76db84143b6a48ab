//! Error types for the stepwise form controller.
//!
//! Errors are grouped by where they originate:
//!
//! - [`LocalValidationError`] - Checks done without touching the network
//! - [`TransportError`] - Failed round trips to the server
//! - [`DefinitionError`] - Invalid or unreadable wizard definitions
//! - [`WizardError`] - Everything an operation on the controller can report
//!
//! None of these are fatal: the controller has already shown the problem to
//! the user when it returns one, and the wizard stays interactable.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::models::{AccountType, CheckKind};

// =============================================================================
// Local Validation Errors
// =============================================================================

/// Problems detected before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalValidationError {
    /// One or more required fields are blank.
    #[error("Please fill in all required fields.")]
    MissingRequired { fields: Vec<String> },

    /// The email field does not look like `local@domain.tld`.
    #[error("Please enter a valid email address.")]
    InvalidEmail { field: String },

    /// Password and confirmation differ.
    #[error("Passwords do not match!")]
    PasswordMismatch { field: String },

    /// Password is shorter than the configured minimum.
    #[error("Password must be at least {min} characters long.")]
    PasswordTooShort { field: String, min: usize },
}

impl LocalValidationError {
    /// Fields that should be marked invalid for this error.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::MissingRequired { fields } => fields.iter().map(String::as_str).collect(),
            Self::InvalidEmail { field }
            | Self::PasswordMismatch { field }
            | Self::PasswordTooShort { field, .. } => vec![field.as_str()],
        }
    }
}

// =============================================================================
// Transport Errors
// =============================================================================

/// A remote call that did not produce a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-2xx status.
    #[error("Server responded with HTTP {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
}

// =============================================================================
// Definition Errors
// =============================================================================

/// Errors while loading or validating a [`crate::WizardDefinition`].
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Failed to read the definition file.
    #[error("Failed to read definition: {0}")]
    Io(#[from] std::io::Error),

    /// Definition JSON is malformed.
    #[error("Definition JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Definition is well-formed but inconsistent.
    #[error("Invalid definition: {0}")]
    Invalid(String),
}

// =============================================================================
// Controller Errors (top-level)
// =============================================================================

/// Everything an operation on [`crate::WizardController`] can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// Local validation failed.
    #[error(transparent)]
    Validation(#[from] LocalValidationError),

    /// The server already knows this email or username.
    #[error("{}", .kind.conflict_message())]
    RemoteConflict { field: String, kind: CheckKind },

    /// A check or submission request failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server rejected the submission.
    #[error("{message}")]
    ServerValidation {
        message: String,
        field_errors: BTreeMap<String, String>,
    },

    /// The wizard is closed.
    #[error("Wizard is not open")]
    NotOpen,

    /// `open` was called on a wizard that is already open.
    #[error("Wizard is already open")]
    AlreadyOpen,

    /// A check or submission is still in flight.
    #[error("Another operation is still in progress")]
    Busy,

    /// The wizard moved on (step change, reset or close) while a check was pending.
    #[error("Wizard changed while a check was pending")]
    Superseded,

    /// `submit` outside the final step.
    #[error("Submission is only allowed from the final step")]
    NotOnFinalStep,

    /// No submission endpoint configured for the discriminator.
    #[error("No submission endpoint configured for account type '{0}'")]
    UnknownAccountType(AccountType),

    /// The field is not declared by any step.
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for controller operations.
pub type WizardResult<T> = Result<T, WizardError>;

/// Result type for definition loading.
pub type DefinitionResult<T> = Result<T, DefinitionError>;
