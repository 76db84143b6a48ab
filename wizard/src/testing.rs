//! In-memory collaborators for controller tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::controller::{Advance, ControllerConfig, WizardController};
use crate::definition::{presets, WizardDefinition};
use crate::error::TransportError;
use crate::models::{CheckKind, ConfirmationSummary, RemoteCheckResult, SubmissionResult};
use crate::notice::{Notice, NoticeLevel};
use crate::ports::{HostUi, UniquenessChecker, WizardSubmitter};

pub type TestController = WizardController<StubChecker, StubSubmitter, RecordingUi>;

// =============================================================================
// Host UI
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCall {
    ShowStep(usize),
    FieldError(String, String),
    ClearFieldError(String),
    ClearFieldErrors,
    Notice(NoticeLevel, String),
    Summary(ConfirmationSummary),
    Busy(bool),
    Close,
    Reload,
}

#[derive(Debug, Default)]
pub struct RecordingUi {
    calls: RefCell<Vec<UiCall>>,
}

impl RecordingUi {
    pub fn calls(&self) -> Vec<UiCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&UiCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    pub fn last_notice(&self) -> Option<(NoticeLevel, String)> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            UiCall::Notice(level, message) => Some((*level, message.clone())),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: UiCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl HostUi for RecordingUi {
    fn show_step(&self, index: usize) {
        self.record(UiCall::ShowStep(index));
    }

    fn show_field_error(&self, field: &str, message: &str) {
        self.record(UiCall::FieldError(field.to_string(), message.to_string()));
    }

    fn clear_field_error(&self, field: &str) {
        self.record(UiCall::ClearFieldError(field.to_string()));
    }

    fn clear_field_errors(&self) {
        self.record(UiCall::ClearFieldErrors);
    }

    fn show_notice(&self, notice: &Notice) {
        self.record(UiCall::Notice(notice.level, notice.message.clone()));
    }

    fn render_confirmation_summary(&self, summary: &ConfirmationSummary) {
        self.record(UiCall::Summary(summary.clone()));
    }

    fn set_submit_busy(&self, busy: bool) {
        self.record(UiCall::Busy(busy));
    }

    fn close_wizard(&self) {
        self.record(UiCall::Close);
    }

    fn reload_host(&self) {
        self.record(UiCall::Reload);
    }
}

// =============================================================================
// Uniqueness Checker
// =============================================================================

#[derive(Default)]
pub struct StubChecker {
    taken: Vec<String>,
    failures: Cell<usize>,
    gate: Option<Rc<Notify>>,
    calls: RefCell<Vec<(CheckKind, String, String)>>,
}

impl StubChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `value` as already registered.
    pub fn with_taken(mut self, value: &str) -> Self {
        self.taken.push(value.to_string());
        self
    }

    /// Fail the next call with HTTP 500.
    pub fn failing_once(self) -> Self {
        self.failures.set(1);
        self
    }

    /// Hold every call until `gate` is notified.
    pub fn gated(mut self, gate: Rc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<(CheckKind, String, String)> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl UniquenessChecker for StubChecker {
    async fn check(
        &self,
        kind: CheckKind,
        endpoint: &str,
        value: &str,
    ) -> Result<RemoteCheckResult, TransportError> {
        self.calls
            .borrow_mut()
            .push((kind, endpoint.to_string(), value.to_string()));

        match &self.gate {
            Some(gate) => gate.notified().await,
            None => tokio::task::yield_now().await,
        }

        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            return Err(TransportError::Status(500));
        }
        Ok(RemoteCheckResult {
            exists: self.taken.iter().any(|taken| taken == value),
        })
    }
}

// =============================================================================
// Submitter
// =============================================================================

pub struct StubSubmitter {
    response: Result<SubmissionResult, TransportError>,
    calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl StubSubmitter {
    pub fn accepting() -> Self {
        Self::replying(Ok(SubmissionResult::accepted("Registration successful!")))
    }

    pub fn replying(response: Result<SubmissionResult, TransportError>) -> Self {
        Self {
            response,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl WizardSubmitter for StubSubmitter {
    async fn submit(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<SubmissionResult, TransportError> {
        self.calls
            .borrow_mut()
            .push((endpoint.to_string(), fields.to_vec()));
        tokio::task::yield_now().await;
        self.response.clone()
    }
}

// =============================================================================
// Helpers
// =============================================================================

pub fn controller(checker: StubChecker, submitter: StubSubmitter) -> TestController {
    controller_for(presets::registration(), checker, submitter)
}

pub fn controller_for(
    definition: WizardDefinition,
    checker: StubChecker,
    submitter: StubSubmitter,
) -> TestController {
    let config = ControllerConfig {
        reload_delay: Duration::ZERO,
    };
    controller_with_config(definition, config, checker, submitter)
}

pub fn controller_with_config(
    definition: WizardDefinition,
    config: ControllerConfig,
    checker: StubChecker,
    submitter: StubSubmitter,
) -> TestController {
    WizardController::with_config(definition, config, checker, submitter, RecordingUi::default())
        .expect("test definitions are valid")
}

pub fn fill_personal(controller: &TestController) {
    for (name, value) in [
        ("first_name", "Ana"),
        ("last_name", "Reyes"),
        ("email", "ana@momentum.io"),
        ("date_hired", "2024-03-01"),
        ("position", "Analyst"),
        ("department", "Finance"),
    ] {
        controller.set_field(name, value).expect("field is declared");
    }
}

pub fn fill_account(controller: &TestController) {
    for (name, value) in [
        ("username", "areyes"),
        ("password", "s3cretpass"),
        ("confirm_password", "s3cretpass"),
    ] {
        controller.set_field(name, value).expect("field is declared");
    }
}

/// Fill both input steps and advance to the confirmation step.
pub async fn reach_confirmation(controller: &TestController) {
    fill_personal(controller);
    assert_eq!(controller.advance().await, Ok(Advance::Moved(1)));
    fill_account(controller);
    assert_eq!(controller.advance().await, Ok(Advance::Moved(2)));
}
