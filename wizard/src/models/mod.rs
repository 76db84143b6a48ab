//! Domain models shared by definitions, the controller and transports.
//!
//! - [`FieldValue`] - A text or checkbox value entered by the user
//! - [`FieldSpec`] - Declaration of one input on a step
//! - [`RemoteCheck`] - A uniqueness check run before leaving a step
//! - [`PasswordRule`] - Local password/confirmation rule
//! - [`AccountType`] - Discriminator selecting the submission endpoint
//! - [`RemoteCheckResult`] / [`SubmissionResult`] - Server answers
//! - [`ConfirmationSummary`] - Read-only recap shown on the confirmation step

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Field Values
// =============================================================================

/// Value of a single form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state.
    Flag(bool),
    /// Any text-like input (text, email, password, date).
    Text(String),
}

impl FieldValue {
    /// Blank text (after trimming) or an unchecked box.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Flag(checked) => !checked,
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    /// Human-readable rendering for summaries.
    pub fn display(&self) -> String {
        match self {
            Self::Flag(true) => "Yes".to_string(),
            Self::Flag(false) => "No".to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Value as a browser would post it; unchecked boxes are omitted.
    pub fn form_value(&self) -> Option<String> {
        match self {
            Self::Flag(true) => Some("on".to_string()),
            Self::Flag(false) => None,
            Self::Text(text) => Some(text.clone()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

// =============================================================================
// Field Declarations
// =============================================================================

/// Kind of input, used by hosts to pick a widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Password,
    Date,
    Checkbox,
}

/// One input on a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Form name posted to the server (e.g. `first_name`).
    pub name: String,
    /// Label shown next to the input.
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Blank values block advancement.
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn email(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn password(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Password)
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn checkbox(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

// =============================================================================
// Remote Checks
// =============================================================================

/// What a remote check verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    Email,
    Username,
}

impl CheckKind {
    /// Server endpoint used when a check does not name one.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Email => "/core/check_email/",
            Self::Username => "/core/check_username/",
        }
    }

    /// Query parameter carrying the value.
    pub fn query_param(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }

    /// Message shown when the value is already registered.
    pub fn conflict_message(&self) -> &'static str {
        match self {
            Self::Email => "Email address already in use.",
            Self::Username => "Username already exists.",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_param())
    }
}

/// Uniqueness check for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCheck {
    pub field: String,
    pub kind: CheckKind,
    /// Overrides [`CheckKind::default_endpoint`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl RemoteCheck {
    pub fn email(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: CheckKind::Email,
            endpoint: None,
        }
    }

    pub fn username(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: CheckKind::Username,
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Endpoint this check hits.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.kind.default_endpoint())
    }
}

/// Local rule for a password/confirmation pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRule {
    pub field: String,
    pub confirm_field: String,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

fn default_min_length() -> usize {
    8
}

impl Default for PasswordRule {
    fn default() -> Self {
        Self {
            field: "password".to_string(),
            confirm_field: "confirm_password".to_string(),
            min_length: default_min_length(),
        }
    }
}

// =============================================================================
// Account Types
// =============================================================================

/// Kind of account a wizard creates. Chosen before the wizard opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Self-registration from the home page.
    Employee,
    /// Administrator created from the admin dashboard.
    Admin,
    /// Supervisor created from the admin dashboard.
    Supervisor,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Server Answers
// =============================================================================

/// Answer of a uniqueness check endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCheckResult {
    pub exists: bool,
}

/// Outcome of a submission, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// Per-field messages for rejected submissions.
    #[serde(default)]
    pub field_errors: Option<BTreeMap<String, String>>,
}

impl SubmissionResult {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn with_field_error(mut self, field: &str, message: &str) -> Self {
        self.field_errors
            .get_or_insert_with(BTreeMap::new)
            .insert(field.to_string(), message.to_string());
        self
    }
}

// =============================================================================
// Confirmation Summary
// =============================================================================

/// Label shown for a field on the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryField {
    pub name: String,
    pub label: String,
}

impl SummaryField {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
        }
    }
}

/// One labelled line of the confirmation summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
}

/// Read-only recap of the entered values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfirmationSummary {
    pub lines: Vec<SummaryLine>,
}

impl ConfirmationSummary {
    /// Value displayed for a label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
