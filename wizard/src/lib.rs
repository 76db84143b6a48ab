//! # Momentum Wizard - stepwise form controller
//!
//! Drives the multi-step registration and account-creation forms of the
//! Momentum employee tracker: per-step validation, server-side uniqueness
//! checks for email and username, a confirmation summary and the final
//! submission.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌───────────────────┐
//! │  Definition │────▶│ WizardController │────▶│ UniquenessChecker │──▶ check endpoints
//! │  (presets / │     │ (steps, phases,  │     ├───────────────────┤
//! │   JSON)     │     │  validation)     │────▶│  WizardSubmitter  │──▶ create endpoints
//! └─────────────┘     └──────────────────┘     └───────────────────┘
//!                              │
//!                              ▼
//!                        ┌──────────┐
//!                        │  HostUi  │ steps, inline errors, notices
//!                        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use momentum_wizard::{presets, AccountType, Advance, WizardController};
//!
//! let wizard = WizardController::new(presets::registration(), checker, submitter, ui)?;
//! wizard.open(AccountType::Employee)?;
//! wizard.set_field("first_name", "Ana")?;
//! match wizard.advance().await? {
//!     Advance::Moved(step) => println!("now on step {}", step),
//!     Advance::Submitted(result) => println!("{}", result.message),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Field values, specs, checks and server answers
//! - [`definition`] - Wizard definitions and built-in presets
//! - [`validation`] - Local validation rules
//! - [`notice`] - Banner messages
//! - [`ports`] - Collaborator traits (server and host UI)
//! - [`controller`] - The stepwise form controller

// Core modules
pub mod error;
pub mod models;

// Form description
pub mod definition;
pub mod validation;

// Presentation
pub mod notice;
pub mod ports;

// Controller
pub mod controller;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    DefinitionError,
    DefinitionResult,
    LocalValidationError,
    TransportError,
    WizardError,
    WizardResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AccountType,
    CheckKind,
    ConfirmationSummary,
    FieldKind,
    FieldSpec,
    FieldValue,
    PasswordRule,
    RemoteCheck,
    RemoteCheckResult,
    SubmissionResult,
    SummaryField,
    SummaryLine,
};

// =============================================================================
// Re-exports - Definitions
// =============================================================================

pub use definition::{presets, StepDefinition, WizardDefinition};

// =============================================================================
// Re-exports - Notices and ports
// =============================================================================

pub use notice::{Notice, NoticeLevel};
pub use ports::{HostUi, UniquenessChecker, WizardSubmitter};

// =============================================================================
// Re-exports - Controller
// =============================================================================

pub use controller::{
    Advance,
    ControllerConfig,
    Phase,
    WizardController,
    WizardState,
    CHECK_FAILED_MESSAGE,
    DEFAULT_REJECTION_MESSAGE,
    DEFAULT_RELOAD_DELAY,
    DEFAULT_SUCCESS_MESSAGE,
    SUBMIT_FAILED_MESSAGE,
};
