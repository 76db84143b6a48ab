//! # Momentum CLI - terminal host for account wizards
//!
//! Connects [`momentum_wizard::WizardController`] to a running Momentum
//! server over HTTP and to the terminal through interactive prompts.
//!
//! ## Modules
//!
//! - [`config`] - Environment and flag configuration
//! - [`error`] - Command error types
//! - [`http`] - reqwest gateway (uniqueness checks, submissions, CSRF)
//! - [`terminal`] - stderr host UI and prompt loop

pub mod config;
pub mod error;
pub mod http;
pub mod terminal;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::CliConfig;
pub use error::{CliError, CliResult, ConfigError};
pub use http::HttpGateway;
pub use terminal::{run_wizard, TerminalUi};
