//! Terminal host for the wizard.
//!
//! [`TerminalUi`] renders controller output on stderr and [`run_wizard`]
//! drives a controller from interactive `dialoguer` prompts.

use std::cell::Cell;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};

use momentum_wizard::{
    AccountType, Advance, ConfirmationSummary, FieldKind, FieldSpec, FieldValue, HostUi, Notice,
    SubmissionResult, UniquenessChecker, WizardController, WizardDefinition, WizardSubmitter,
};

use crate::error::CliResult;

/// [`HostUi`] writing to stderr.
pub struct TerminalUi {
    titles: Vec<String>,
    reloaded: Cell<bool>,
}

impl TerminalUi {
    pub fn new(definition: &WizardDefinition) -> Self {
        Self {
            titles: definition.steps.iter().map(|s| s.title.clone()).collect(),
            reloaded: Cell::new(false),
        }
    }

    /// Whether the wizard asked for a reload after a successful submission.
    pub fn reloaded(&self) -> bool {
        self.reloaded.get()
    }
}

impl HostUi for TerminalUi {
    fn show_step(&self, index: usize) {
        let title = self.titles.get(index).map(String::as_str).unwrap_or_default();
        eprintln!("\n📝 Step {}/{}: {}", index + 1, self.titles.len(), title);
    }

    fn show_field_error(&self, field: &str, message: &str) {
        eprintln!("   ⚠️  {}: {}", field, message);
    }

    fn clear_field_error(&self, field: &str) {
        log::debug!("Cleared error on '{}'", field);
    }

    fn clear_field_errors(&self) {}

    fn show_notice(&self, notice: &Notice) {
        eprintln!("{} [{}] {}", notice.level.emoji(), notice.timestamp, notice.message);
    }

    fn render_confirmation_summary(&self, summary: &ConfirmationSummary) {
        eprintln!("\n📋 Please review your details:");
        for line in &summary.lines {
            eprintln!("   {:<18} {}", format!("{}:", line.label), line.value);
        }
    }

    fn set_submit_busy(&self, busy: bool) {
        if busy {
            eprintln!("⏳ Processing...");
        }
    }

    fn close_wizard(&self) {
        eprintln!("👋 Wizard closed");
    }

    fn reload_host(&self) {
        self.reloaded.set(true);
    }
}

/// Run `controller` interactively until it closes.
///
/// Returns the accepted submission, or `None` when the user cancelled.
pub async fn run_wizard<C, S>(
    controller: &WizardController<C, S, TerminalUi>,
    account_type: AccountType,
) -> CliResult<Option<SubmissionResult>>
where
    C: UniquenessChecker,
    S: WizardSubmitter,
{
    let theme = ColorfulTheme::default();
    controller.open(account_type)?;

    while controller.is_open() {
        let index = controller.current_step();
        let Some(step) = controller.definition().step(index) else {
            break;
        };

        for field in &step.fields {
            let value = prompt_field(&theme, field, controller.field_value(&field.name))?;
            controller.set_field(&field.name, value)?;
        }

        let forward = if index + 1 == controller.total_steps() {
            "Submit"
        } else {
            "Next"
        };
        let choice = Select::with_theme(&theme)
            .items(&[forward, "Back", "Cancel"])
            .default(0)
            .interact()?;

        match choice {
            0 => match controller.advance().await {
                Ok(Advance::Submitted(result)) => return Ok(Some(result)),
                Ok(Advance::Moved(_)) => {}
                Err(err) => log::debug!("Step {} not accepted: {}", index, err),
            },
            1 => {
                controller.retreat();
            }
            _ => controller.close()?,
        }
    }

    Ok(None)
}

fn prompt_field(
    theme: &ColorfulTheme,
    field: &FieldSpec,
    current: Option<FieldValue>,
) -> CliResult<FieldValue> {
    let mut prompt = field.label.clone();
    if field.kind == FieldKind::Date {
        prompt.push_str(" (YYYY-MM-DD)");
    }
    if field.required {
        prompt.push_str(" *");
    }

    let value = match field.kind {
        FieldKind::Checkbox => {
            let checked = matches!(current, Some(FieldValue::Flag(true)));
            let answer = Confirm::with_theme(theme)
                .with_prompt(prompt)
                .default(checked)
                .interact()?;
            FieldValue::Flag(answer)
        }
        FieldKind::Password => {
            let answer = Password::with_theme(theme)
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()?;
            FieldValue::Text(answer)
        }
        FieldKind::Text | FieldKind::Email | FieldKind::Date => {
            let mut input = Input::<String>::with_theme(theme)
                .with_prompt(prompt)
                .allow_empty(true);
            if let Some(text) = current.as_ref().and_then(FieldValue::as_text) {
                input = input.with_initial_text(text);
            }
            FieldValue::Text(input.interact_text()?)
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use momentum_wizard::presets;

    #[test]
    fn test_records_reload_request() {
        let ui = TerminalUi::new(&presets::registration());
        assert_eq!(ui.titles, vec!["Personal Information", "Account", "Confirm"]);
        assert!(!ui.reloaded());

        ui.show_step(1);
        ui.reload_host();
        assert!(ui.reloaded());
    }
}
