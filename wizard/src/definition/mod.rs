//! Wizard definitions.
//!
//! A [`WizardDefinition`] describes the ordered steps of a wizard, which fields
//! each step requires, which remote checks gate it, the confirmation step and
//! where the collected fields are posted for each [`AccountType`].
//!
//! Definitions are plain data: they can be built in code (see [`presets`]) or
//! loaded from JSON so a deployment can ship its own forms.
//!
//! ```rust,ignore
//! use momentum_wizard::WizardDefinition;
//!
//! let definition = WizardDefinition::from_file("forms/registration.json")?;
//! println!("{} steps", definition.total_steps());
//! ```

pub mod presets;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, DefinitionResult};
use crate::models::{AccountType, FieldSpec, PasswordRule, RemoteCheck, SummaryField};

/// One screen of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    /// Position in the step sequence.
    pub index: usize,

    #[serde(default)]
    pub title: String,

    /// Inputs shown on this step, in display order.
    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    /// Uniqueness checks, run in order after local validation.
    #[serde(default)]
    pub remote_checks: Vec<RemoteCheck>,

    /// Password/confirmation rule applied before remote checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_rule: Option<PasswordRule>,
}

impl StepDefinition {
    pub fn new(index: usize, title: &str) -> Self {
        Self {
            index,
            title: title.to_string(),
            fields: Vec::new(),
            remote_checks: Vec::new(),
            password_rule: None,
        }
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_check(mut self, check: RemoteCheck) -> Self {
        self.remote_checks.push(check);
        self
    }

    pub fn with_password_rule(mut self, rule: PasswordRule) -> Self {
        self.password_rule = Some(rule);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Complete description of a wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardDefinition {
    pub name: String,

    pub steps: Vec<StepDefinition>,

    /// Step that shows the read-only summary.
    #[serde(default)]
    pub confirmation_step: Option<usize>,

    /// Fields listed on the confirmation step, in order.
    #[serde(default)]
    pub summary_fields: Vec<SummaryField>,

    /// Submission endpoint per account type.
    pub endpoints: BTreeMap<AccountType, String>,
}

impl WizardDefinition {
    /// Parse and validate a definition from JSON.
    pub fn from_json(json: &str) -> DefinitionResult<Self> {
        let definition: Self = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Read, parse and validate a definition file.
    pub fn from_file(path: impl AsRef<Path>) -> DefinitionResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> DefinitionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn endpoint_for(&self, account_type: AccountType) -> Option<&str> {
        self.endpoints.get(&account_type).map(String::as_str)
    }

    /// Declaration of a field on any step.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.steps.iter().find_map(|step| step.field(name))
    }

    /// Check the definition is internally consistent.
    pub fn validate(&self) -> DefinitionResult<()> {
        if self.steps.is_empty() {
            return invalid("a wizard needs at least one step");
        }

        for (position, step) in self.steps.iter().enumerate() {
            if step.index != position {
                return invalid(format!(
                    "step '{}' has index {} but is at position {}",
                    step.title, step.index, position
                ));
            }

            for field in &step.fields {
                if self.declarations(&field.name) > 1 {
                    return invalid(format!("field '{}' is declared more than once", field.name));
                }
            }

            for check in &step.remote_checks {
                if step.field(&check.field).is_none() {
                    return invalid(format!(
                        "remote check on '{}' in step {} targets an undeclared field",
                        check.field, position
                    ));
                }
            }

            if let Some(rule) = &step.password_rule {
                for name in [&rule.field, &rule.confirm_field] {
                    if step.field(name).is_none() {
                        return invalid(format!(
                            "password rule in step {} names undeclared field '{}'",
                            position, name
                        ));
                    }
                }
            }
        }

        if let Some(confirmation) = self.confirmation_step {
            if confirmation >= self.steps.len() {
                return invalid(format!(
                    "confirmation step {} is out of range ({} steps)",
                    confirmation,
                    self.steps.len()
                ));
            }
        }

        for summary in &self.summary_fields {
            if self.field(&summary.name).is_none() {
                return invalid(format!("summary lists undeclared field '{}'", summary.name));
            }
        }

        if self.endpoints.is_empty() {
            return invalid("no submission endpoint configured");
        }

        Ok(())
    }

    fn declarations(&self, name: &str) -> usize {
        self.steps
            .iter()
            .flat_map(|step| &step.fields)
            .filter(|field| field.name == name)
            .count()
    }
}

fn invalid<T>(message: impl Into<String>) -> DefinitionResult<T> {
    Err(DefinitionError::Invalid(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn minimal() -> WizardDefinition {
        WizardDefinition {
            name: "minimal".into(),
            steps: vec![StepDefinition::new(0, "Only")
                .with_field(FieldSpec::email("email", "Email").required())
                .with_check(RemoteCheck::email("email"))],
            confirmation_step: None,
            summary_fields: vec![],
            endpoints: BTreeMap::from([(AccountType::Employee, "/core/registration/".to_string())]),
        }
    }

    #[test]
    fn test_presets_are_valid() {
        presets::registration().validate().unwrap();
        presets::account_creation().validate().unwrap();
    }

    #[test]
    fn test_json_keeps_endpoints_and_checks() {
        let json = presets::account_creation().to_json().unwrap();
        assert!(json.contains("\"supervisor\""));
        assert!(json.contains("\"remoteChecks\""));

        let parsed = WizardDefinition::from_json(&json).unwrap();
        assert_eq!(parsed, presets::account_creation());
    }

    #[test]
    fn test_rejects_check_on_undeclared_field() {
        let mut definition = minimal();
        definition.steps[0].remote_checks.push(RemoteCheck::username("username"));
        let err = definition.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared field"));
    }

    #[test]
    fn test_rejects_out_of_range_confirmation() {
        let mut definition = minimal();
        definition.confirmation_step = Some(1);
        assert!(matches!(definition.validate(), Err(DefinitionError::Invalid(_))));
    }

    #[test]
    fn test_rejects_misnumbered_steps_and_missing_endpoints() {
        let mut definition = minimal();
        definition.steps[0].index = 3;
        assert!(definition.validate().is_err());

        let mut definition = minimal();
        definition.endpoints.clear();
        assert!(definition.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_field_across_steps() {
        let mut definition = minimal();
        definition.steps.push(
            StepDefinition::new(1, "Again").with_field(FieldSpec::email("email", "Email")),
        );
        let err = definition.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(minimal().to_json().unwrap().as_bytes()).unwrap();

        let loaded = WizardDefinition::from_file(file.path()).unwrap();
        assert_eq!(loaded.total_steps(), 1);
        assert_eq!(loaded.endpoint_for(AccountType::Employee), Some("/core/registration/"));
        assert_eq!(loaded.endpoint_for(AccountType::Admin), None);
    }

    #[test]
    fn test_from_file_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(matches!(
            WizardDefinition::from_file(file.path()),
            Err(DefinitionError::Json(_))
        ));
    }
}
