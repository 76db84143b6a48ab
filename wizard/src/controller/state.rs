//! Mutable state of one wizard instance.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ConfirmationSummary, FieldValue, SummaryField, SummaryLine};

/// Where the wizard is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Not shown. Initial and terminal.
    Closed,
    /// Waiting for user input on the current step.
    Editing,
    /// Remote checks for the current step are in flight.
    Checking,
    /// The final submission is in flight.
    Submitting,
}

/// Step position, entered values and inline errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub current_step: usize,
    pub total_steps: usize,
    pub field_values: BTreeMap<String, FieldValue>,
    pub validation_errors: BTreeMap<String, String>,
}

impl WizardState {
    pub fn new(total_steps: usize) -> Self {
        Self {
            current_step: 0,
            total_steps,
            field_values: BTreeMap::new(),
            validation_errors: BTreeMap::new(),
        }
    }

    /// Back to step 0 with no values and no errors.
    pub fn reset(&mut self) {
        self.current_step = 0;
        self.field_values.clear();
        self.validation_errors.clear();
    }

    pub fn is_final_step(&self) -> bool {
        self.current_step + 1 == self.total_steps
    }

    /// Trimmed text of a field, empty when unset.
    pub fn text(&self, name: &str) -> String {
        self.field_values
            .get(name)
            .and_then(FieldValue::as_text)
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    }

    /// Fields as a browser would post them.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.field_values
            .iter()
            .filter_map(|(name, value)| value.form_value().map(|v| (name.clone(), v)))
            .collect()
    }

    /// Labelled recap of `fields`. Unset fields render as empty.
    pub fn summary(&self, fields: &[SummaryField]) -> ConfirmationSummary {
        let lines = fields
            .iter()
            .map(|field| SummaryLine {
                label: field.label.clone(),
                value: self
                    .field_values
                    .get(&field.name)
                    .map(FieldValue::display)
                    .unwrap_or_default(),
            })
            .collect();
        ConfirmationSummary { lines }
    }
}
