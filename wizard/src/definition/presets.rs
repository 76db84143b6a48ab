//! Built-in wizard definitions.
//!
//! - [`registration`] - self-registration from the home page
//! - [`account_creation`] - admin and supervisor accounts from the admin dashboard
//!
//! Both share the same three screens: personal information (email checked),
//! account credentials (username checked, password rule) and confirmation.

use std::collections::BTreeMap;

use super::{StepDefinition, WizardDefinition};
use crate::models::{AccountType, FieldSpec, PasswordRule, RemoteCheck, SummaryField};

/// Endpoint receiving self-registrations.
pub const REGISTRATION_ENDPOINT: &str = "/core/registration/";

/// Endpoint creating administrator accounts.
pub const CREATE_ADMIN_ENDPOINT: &str = "/core/admin/create-admin/";

/// Endpoint creating supervisor accounts.
pub const CREATE_SUPERVISOR_ENDPOINT: &str = "/core/admin/create-supervisor/";

/// Employee self-registration wizard.
pub fn registration() -> WizardDefinition {
    WizardDefinition {
        name: "registration".to_string(),
        steps: standard_steps(),
        confirmation_step: Some(2),
        summary_fields: standard_summary(),
        endpoints: BTreeMap::from([(AccountType::Employee, REGISTRATION_ENDPOINT.to_string())]),
    }
}

/// Account creation wizard used by administrators.
pub fn account_creation() -> WizardDefinition {
    WizardDefinition {
        name: "account-creation".to_string(),
        steps: standard_steps(),
        confirmation_step: Some(2),
        summary_fields: standard_summary(),
        endpoints: BTreeMap::from([
            (AccountType::Admin, CREATE_ADMIN_ENDPOINT.to_string()),
            (AccountType::Supervisor, CREATE_SUPERVISOR_ENDPOINT.to_string()),
        ]),
    }
}

fn standard_steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(0, "Personal Information")
            .with_field(FieldSpec::text("first_name", "First Name").required())
            .with_field(FieldSpec::text("last_name", "Last Name").required())
            .with_field(FieldSpec::email("email", "Email").required())
            .with_field(FieldSpec::date("date_hired", "Date Hired").required())
            .with_field(FieldSpec::text("position", "Position").required())
            .with_field(FieldSpec::text("department", "Department").required())
            .with_check(RemoteCheck::email("email")),
        StepDefinition::new(1, "Account")
            .with_field(FieldSpec::text("username", "Username").required())
            .with_field(FieldSpec::password("password", "Password").required())
            .with_field(FieldSpec::password("confirm_password", "Confirm Password").required())
            .with_password_rule(PasswordRule::default())
            .with_check(RemoteCheck::username("username")),
        StepDefinition::new(2, "Confirm"),
    ]
}

fn standard_summary() -> Vec<SummaryField> {
    vec![
        SummaryField::new("first_name", "First Name"),
        SummaryField::new("last_name", "Last Name"),
        SummaryField::new("email", "Email"),
        SummaryField::new("date_hired", "Date Hired"),
        SummaryField::new("position", "Position"),
        SummaryField::new("department", "Department"),
        SummaryField::new("username", "Username"),
    ]
}
