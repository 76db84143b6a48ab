//! Local validation rules.
//!
//! These run before any remote check so that obviously bad input never
//! reaches the server:
//!
//! - [`missing_required`] - blank required fields of a step
//! - [`is_valid_email`] - `local@domain.tld` shape
//! - [`check_password`] - confirmation match and minimum length

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definition::StepDefinition;
use crate::error::LocalValidationError;
use crate::models::{FieldValue, PasswordRule};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Whether `email` looks like `local@domain.tld`. Surrounding whitespace is ignored.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Blank-or-missing check used for required fields.
pub fn is_blank(value: Option<&FieldValue>) -> bool {
    value.map_or(true, FieldValue::is_blank)
}

/// Required fields of `step` that are blank, in declaration order.
pub fn missing_required(
    step: &StepDefinition,
    values: &BTreeMap<String, FieldValue>,
) -> Vec<String> {
    step.fields
        .iter()
        .filter(|field| field.required && is_blank(values.get(&field.name)))
        .map(|field| field.name.clone())
        .collect()
}

/// Apply a password rule. Mismatch is reported before length.
pub fn check_password(
    rule: &PasswordRule,
    values: &BTreeMap<String, FieldValue>,
) -> Result<(), LocalValidationError> {
    let password = text_of(values, &rule.field);
    let confirm = text_of(values, &rule.confirm_field);

    if password != confirm {
        return Err(LocalValidationError::PasswordMismatch {
            field: rule.confirm_field.clone(),
        });
    }

    if password.chars().count() < rule.min_length {
        return Err(LocalValidationError::PasswordTooShort {
            field: rule.field.clone(),
            min: rule.min_length,
        });
    }

    Ok(())
}

fn text_of<'a>(values: &'a BTreeMap<String, FieldValue>, name: &str) -> &'a str {
    values
        .get(name)
        .and_then(FieldValue::as_text)
        .unwrap_or_default()
}
