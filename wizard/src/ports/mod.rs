//! Collaborators the controller talks to.
//!
//! The controller owns no I/O. It reaches the server through
//! [`UniquenessChecker`] and [`WizardSubmitter`], and the screen through
//! [`HostUi`]. Futures are not required to be `Send`: a wizard lives on the
//! UI thread of its host.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::models::{CheckKind, ConfirmationSummary, RemoteCheckResult, SubmissionResult};
use crate::notice::Notice;

/// Asks the server whether a value is already registered.
#[async_trait(?Send)]
pub trait UniquenessChecker {
    /// Check `value` against the kind-specific `endpoint`.
    ///
    /// Network failures, non-2xx statuses and undecodable bodies are all
    /// reported as [`TransportError`]. Results are never cached.
    async fn check(
        &self,
        kind: CheckKind,
        endpoint: &str,
        value: &str,
    ) -> Result<RemoteCheckResult, TransportError>;
}

/// Posts the collected fields to the server.
#[async_trait(?Send)]
pub trait WizardSubmitter {
    /// Submit form-encoded `fields` to `endpoint`.
    ///
    /// Implementations attach the session's CSRF token, read at call time.
    async fn submit(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<SubmissionResult, TransportError>;
}

/// Presentation side of the wizard.
pub trait HostUi {
    /// Display step `index` and hide the others.
    fn show_step(&self, index: usize);

    /// Mark a field invalid with an inline message.
    fn show_field_error(&self, field: &str, message: &str);

    /// Remove the inline error of one field (the user edited it).
    fn clear_field_error(&self, field: &str);

    /// Remove every inline error.
    fn clear_field_errors(&self);

    /// Show a banner message.
    fn show_notice(&self, notice: &Notice);

    /// Fill the confirmation step.
    fn render_confirmation_summary(&self, summary: &ConfirmationSummary);

    /// Disable the submit control and show a busy label, or restore it.
    fn set_submit_busy(&self, busy: bool);

    /// Hide the wizard.
    fn close_wizard(&self);

    /// Reload the host view after a successful submission.
    fn reload_host(&self);
}
