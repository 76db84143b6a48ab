//! The stepwise form controller.
//!
//! [`WizardController`] walks the user through the steps of a
//! [`WizardDefinition`], gating each forward move on local validation and on
//! the step's remote uniqueness checks, renders the confirmation summary and
//! finally submits the collected fields.
//!
//! ```text
//!            open()            advance() ok          advance() ok
//! Closed ───────────▶ Step(0) ─────────────▶ … ─────────────▶ Step(n-1, confirm)
//!   ▲                   ▲  ◀── retreat() ──                        │ advance()/submit()
//!   │                                                              ▼
//!   │◀──────────── close()/reload ◀──── success ──────────── Submitting
//!                                                  failure ──▶ Step(n-1)
//! ```
//!
//! All methods take `&self`. State lives in `Cell`/`RefCell` and no borrow is
//! held across an await, so a host can call [`WizardController::retreat`] or
//! [`WizardController::close`] while an `advance()` is suspended on a check.
//! Each forward move takes a ticket (session id + generation); a continuation
//! whose ticket is stale is dropped without touching the UI.

mod state;

pub use state::{Phase, WizardState};

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::time::Duration;

use uuid::Uuid;

use crate::definition::{StepDefinition, WizardDefinition};
use crate::error::{DefinitionResult, LocalValidationError, WizardError, WizardResult};
use crate::models::{
    AccountType, CheckKind, ConfirmationSummary, FieldValue, RemoteCheckResult, SubmissionResult,
};
use crate::notice::Notice;
use crate::ports::{HostUi, UniquenessChecker, WizardSubmitter};
use crate::validation;

/// Delay between a successful submission and the host reload.
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(1500);

/// Shown when a uniqueness check cannot be completed.
pub const CHECK_FAILED_MESSAGE: &str = "Error checking availability. Please try again.";

/// Shown when the submission request itself fails.
pub const SUBMIT_FAILED_MESSAGE: &str = "An error occurred while submitting. Please try again.";

/// Shown when the server rejects a submission without a message.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Unable to create the account. Please review the form.";

/// Shown when the server accepts a submission without a message.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Account created successfully!";

/// Tunables of a controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Pause after a successful submission before closing and reloading.
    pub reload_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }
}

/// Successful outcome of [`WizardController::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Now showing this step.
    Moved(usize),
    /// The final step was submitted and accepted.
    Submitted(SubmissionResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    session: Uuid,
    generation: u64,
}

/// Drives one wizard instance.
pub struct WizardController<C, S, U> {
    definition: WizardDefinition,
    config: ControllerConfig,
    checker: C,
    submitter: S,
    ui: U,
    state: RefCell<WizardState>,
    phase: Cell<Phase>,
    session: Cell<Option<Uuid>>,
    account_type: Cell<Option<AccountType>>,
    generation: Cell<u64>,
}

impl<C, S, U> WizardController<C, S, U>
where
    C: UniquenessChecker,
    S: WizardSubmitter,
    U: HostUi,
{
    /// Create a closed controller with the default configuration.
    pub fn new(definition: WizardDefinition, checker: C, submitter: S, ui: U) -> DefinitionResult<Self> {
        Self::with_config(definition, ControllerConfig::default(), checker, submitter, ui)
    }

    /// Create a closed controller. Fails if the definition is inconsistent.
    pub fn with_config(
        definition: WizardDefinition,
        config: ControllerConfig,
        checker: C,
        submitter: S,
        ui: U,
    ) -> DefinitionResult<Self> {
        definition.validate()?;
        let total_steps = definition.total_steps();

        Ok(Self {
            definition,
            config,
            checker,
            submitter,
            ui,
            state: RefCell::new(WizardState::new(total_steps)),
            phase: Cell::new(Phase::Closed),
            session: Cell::new(None),
            account_type: Cell::new(None),
            generation: Cell::new(0),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn definition(&self) -> &WizardDefinition {
        &self.definition
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn is_open(&self) -> bool {
        self.phase.get() != Phase::Closed
    }

    /// Discriminator chosen at `open`, while the wizard is open.
    pub fn account_type(&self) -> Option<AccountType> {
        self.account_type.get()
    }

    pub fn current_step(&self) -> usize {
        self.state.borrow().current_step
    }

    pub fn total_steps(&self) -> usize {
        self.state.borrow().total_steps
    }

    pub fn field_value(&self, name: &str) -> Option<FieldValue> {
        self.state.borrow().field_values.get(name).cloned()
    }

    pub fn validation_errors(&self) -> BTreeMap<String, String> {
        self.state.borrow().validation_errors.clone()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> WizardState {
        self.state.borrow().clone()
    }

    /// Confirmation summary built from the current values.
    pub fn summary(&self) -> ConfirmationSummary {
        self.state.borrow().summary(&self.definition.summary_fields)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the wizard for `account_type` on step 0 with empty fields.
    pub fn open(&self, account_type: AccountType) -> WizardResult<()> {
        if self.is_open() {
            return Err(WizardError::AlreadyOpen);
        }
        if self.definition.endpoint_for(account_type).is_none() {
            return Err(WizardError::UnknownAccountType(account_type));
        }

        let session = Uuid::new_v4();
        self.state.borrow_mut().reset();
        self.session.set(Some(session));
        self.account_type.set(Some(account_type));
        self.phase.set(Phase::Editing);
        self.bump();

        log::info!(
            "Opened '{}' wizard for {} (session {})",
            self.definition.name,
            account_type,
            session
        );
        self.ui.clear_field_errors();
        self.ui.show_step(0);
        Ok(())
    }

    /// Close the wizard (close control or backdrop) and reset it.
    ///
    /// Closing an already closed wizard does nothing. Refused with
    /// [`WizardError::Busy`] while a submission is in flight.
    pub fn close(&self) -> WizardResult<()> {
        match self.phase.get() {
            Phase::Closed => return Ok(()),
            Phase::Submitting => return Err(WizardError::Busy),
            Phase::Editing | Phase::Checking => {}
        }

        self.ui.close_wizard();
        self.end_session();
        self.reset_state();
        log::debug!("Wizard '{}' closed", self.definition.name);
        Ok(())
    }

    /// Back to step 0 with no values and no errors. Idempotent.
    ///
    /// Ignored while a submission is in flight. A pending check is abandoned.
    pub fn reset(&self) {
        if self.phase.get() == Phase::Submitting {
            log::debug!("Reset ignored while submitting");
            return;
        }

        self.reset_state();
        if self.phase.get() == Phase::Checking {
            self.phase.set(Phase::Editing);
        }
        if self.is_open() {
            self.ui.show_step(0);
        }
    }

    /// Record an input change and clear that field's inline error.
    ///
    /// An edit while checks are pending abandons them: the pending `advance()`
    /// returns [`WizardError::Superseded`] and the step must be advanced again.
    pub fn set_field(&self, name: &str, value: impl Into<FieldValue>) -> WizardResult<()> {
        match self.phase.get() {
            Phase::Closed => return Err(WizardError::NotOpen),
            Phase::Submitting => return Err(WizardError::Busy),
            Phase::Editing | Phase::Checking => {}
        }
        if self.definition.field(name).is_none() {
            return Err(WizardError::UnknownField(name.to_string()));
        }

        let had_error = {
            let mut state = self.state.borrow_mut();
            state.field_values.insert(name.to_string(), value.into());
            state.validation_errors.remove(name).is_some()
        };
        if had_error {
            self.ui.clear_field_error(name);
        }

        if self.phase.get() == Phase::Checking {
            log::debug!("'{}' edited while checking, abandoning checks", name);
            self.phase.set(Phase::Editing);
            self.bump();
        }
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Go back one step. No validation, no remote calls; a no-op on step 0.
    ///
    /// Returns the step now shown.
    pub fn retreat(&self) -> usize {
        if matches!(self.phase.get(), Phase::Closed | Phase::Submitting) {
            return self.current_step();
        }

        let index = {
            let mut state = self.state.borrow_mut();
            if state.current_step == 0 {
                return 0;
            }
            state.current_step -= 1;
            state.current_step
        };

        self.phase.set(Phase::Editing);
        self.bump();
        self.ui.show_step(index);
        index
    }

    /// Validate the current step and move forward, or submit on the final step.
    ///
    /// Required fields are checked first, then the password rule, then the
    /// remote checks one after the other. The first failure wins, is shown
    /// to the user and returned; the step does not change.
    pub async fn advance(&self) -> WizardResult<Advance> {
        self.ensure_editing()?;

        let index = self.current_step();
        let step = &self.definition.steps[index];
        self.clear_step_errors(step);

        if let Err(err) = self.validate_locally(step) {
            self.report_local(&err);
            return Err(err.into());
        }

        if !step.remote_checks.is_empty() {
            let ticket = self.begin(Phase::Checking)?;
            let outcome = self.run_remote_checks(step, ticket).await;
            if !self.is_current(ticket) {
                log::debug!("Dropping stale checks for step {}", index);
                return Err(WizardError::Superseded);
            }
            self.phase.set(Phase::Editing);
            outcome?;
        }

        if self.state.borrow().is_final_step() {
            return self.submit().await.map(Advance::Submitted);
        }

        Ok(Advance::Moved(self.move_forward()))
    }

    /// Post every field to the endpoint of the chosen account type.
    ///
    /// Only allowed on the final step. The submit control stays disabled for
    /// the whole round trip, so concurrent calls get [`WizardError::Busy`]. On
    /// success the wizard closes and the host reloads exactly once.
    pub async fn submit(&self) -> WizardResult<SubmissionResult> {
        self.ensure_editing()?;
        if !self.state.borrow().is_final_step() {
            return Err(WizardError::NotOnFinalStep);
        }

        let account_type = self.account_type.get().ok_or(WizardError::NotOpen)?;
        let endpoint = self
            .definition
            .endpoint_for(account_type)
            .ok_or(WizardError::UnknownAccountType(account_type))?;

        self.begin(Phase::Submitting)?;
        self.ui.set_submit_busy(true);

        let fields = self.state.borrow().form_fields();
        log::info!("Submitting {} fields to {}", fields.len(), endpoint);

        match self.submitter.submit(endpoint, &fields).await {
            Ok(result) if result.success => {
                self.finish(&result).await;
                Ok(result)
            }
            Ok(result) => Err(self.reject(&result)),
            Err(err) => {
                log::warn!("Submission to {} failed: {}", endpoint, err);
                self.phase.set(Phase::Editing);
                self.ui.show_notice(&Notice::error(SUBMIT_FAILED_MESSAGE));
                self.ui.set_submit_busy(false);
                Err(err.into())
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_editing(&self) -> WizardResult<()> {
        match self.phase.get() {
            Phase::Closed => Err(WizardError::NotOpen),
            Phase::Checking | Phase::Submitting => Err(WizardError::Busy),
            Phase::Editing => Ok(()),
        }
    }

    fn bump(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    fn begin(&self, phase: Phase) -> WizardResult<Ticket> {
        let session = self.session.get().ok_or(WizardError::NotOpen)?;
        self.phase.set(phase);
        self.bump();
        Ok(Ticket {
            session,
            generation: self.generation.get(),
        })
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.session.get() == Some(ticket.session) && self.generation.get() == ticket.generation
    }

    fn end_session(&self) {
        self.phase.set(Phase::Closed);
        self.session.set(None);
        self.account_type.set(None);
        self.bump();
    }

    fn reset_state(&self) {
        self.state.borrow_mut().reset();
        self.bump();
        self.ui.clear_field_errors();
    }

    fn clear_step_errors(&self, step: &StepDefinition) {
        {
            let mut state = self.state.borrow_mut();
            for field in &step.fields {
                state.validation_errors.remove(&field.name);
            }
        }
        self.ui.clear_field_errors();
    }

    fn validate_locally(&self, step: &StepDefinition) -> Result<(), LocalValidationError> {
        let state = self.state.borrow();

        let missing = validation::missing_required(step, &state.field_values);
        if !missing.is_empty() {
            return Err(LocalValidationError::MissingRequired { fields: missing });
        }

        if let Some(rule) = &step.password_rule {
            validation::check_password(rule, &state.field_values)?;
        }
        Ok(())
    }

    async fn run_remote_checks(&self, step: &StepDefinition, ticket: Ticket) -> WizardResult<()> {
        for check in &step.remote_checks {
            let value = self.state.borrow().text(&check.field);
            if value.is_empty() {
                continue;
            }

            if check.kind == CheckKind::Email && !validation::is_valid_email(&value) {
                let err = LocalValidationError::InvalidEmail {
                    field: check.field.clone(),
                };
                self.report_local(&err);
                return Err(err.into());
            }

            log::debug!("Checking {} '{}' via {}", check.kind, value, check.endpoint());
            let result = self.checker.check(check.kind, check.endpoint(), &value).await;
            if !self.is_current(ticket) {
                return Err(WizardError::Superseded);
            }

            match result {
                Ok(RemoteCheckResult { exists: false }) => {}
                Ok(RemoteCheckResult { exists: true }) => {
                    let message = check.kind.conflict_message();
                    self.mark_invalid(&check.field, message);
                    self.ui.show_notice(&Notice::error(message));
                    return Err(WizardError::RemoteConflict {
                        field: check.field.clone(),
                        kind: check.kind,
                    });
                }
                Err(err) => {
                    log::warn!("Availability check for '{}' failed: {}", check.field, err);
                    self.ui.show_notice(&Notice::error(CHECK_FAILED_MESSAGE));
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    fn move_forward(&self) -> usize {
        let next = {
            let mut state = self.state.borrow_mut();
            state.current_step += 1;
            state.current_step
        };
        self.bump();

        if self.definition.confirmation_step == Some(next) {
            let summary = self.summary();
            self.ui.render_confirmation_summary(&summary);
        }
        self.ui.show_step(next);
        log::debug!("Advanced to step {}", next);
        next
    }

    fn mark_invalid(&self, field: &str, message: &str) {
        self.state
            .borrow_mut()
            .validation_errors
            .insert(field.to_string(), message.to_string());
        self.ui.show_field_error(field, message);
    }

    fn report_local(&self, err: &LocalValidationError) {
        let message = err.to_string();
        for field in err.fields() {
            self.mark_invalid(field, &message);
        }
        self.ui.show_notice(&Notice::error(message));
    }

    async fn finish(&self, result: &SubmissionResult) {
        let message = if result.message.is_empty() {
            DEFAULT_SUCCESS_MESSAGE
        } else {
            result.message.as_str()
        };
        self.ui.show_notice(&Notice::success(message));

        if !self.config.reload_delay.is_zero() {
            tokio::time::sleep(self.config.reload_delay).await;
        }

        self.ui.close_wizard();
        self.end_session();
        self.reset_state();
        log::info!("Submission accepted, reloading host");
        self.ui.reload_host();
    }

    fn reject(&self, result: &SubmissionResult) -> WizardError {
        let message = if result.message.is_empty() {
            DEFAULT_REJECTION_MESSAGE.to_string()
        } else {
            result.message.clone()
        };

        let mut field_errors = BTreeMap::new();
        for (field, error) in result.field_errors.iter().flatten() {
            if self.definition.field(field).is_some() {
                self.mark_invalid(field, error);
                field_errors.insert(field.clone(), error.clone());
            } else {
                log::warn!("Ignoring server error for unknown field '{}': {}", field, error);
            }
        }

        self.ui.show_notice(&Notice::error(message.clone()));
        self.phase.set(Phase::Editing);
        self.ui.set_submit_busy(false);

        WizardError::ServerValidation {
            message,
            field_errors,
        }
    }
}
