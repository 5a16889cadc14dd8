use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::domain::{Validation, ValidationRule, Widget};

use super::store::FormSession;

/// A field-level validation failure, keyed by the widget's field so the
/// renderer can attach it to the right control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

type ValidatorFn = Box<dyn Fn(&Value) -> Result<(), String>>;

/// Registry of custom validator implementations, looked up by the opaque
/// `validator` name a `custom` rule carries.
#[derive(Default)]
pub struct CustomValidators {
    validators: HashMap<String, ValidatorFn>,
}

impl CustomValidators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        validator: impl Fn(&Value) -> Result<(), String> + 'static,
    ) {
        self.validators.insert(name.into(), Box::new(validator));
    }

    fn run(&self, name: &str, value: &Value) -> Option<Result<(), String>> {
        self.validators.get(name).map(|validator| validator(value))
    }
}

impl fmt::Debug for CustomValidators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidators")
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Applies every widget's validation rules to the session's current values.
///
/// Widgets whose resolved `visible` is false are skipped entirely: a hidden
/// required field must never block submission. Requiredness comes from the
/// evaluator's resolved state, which already folds in the declared flag and
/// any require/optional dependency action.
pub fn validate_submission(session: &FormSession, custom: &CustomValidators) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for widget in session.widgets() {
        if !widget.holds_value() {
            continue;
        }
        let Some(state) = session.resolved(&widget.id) else {
            continue;
        };
        if !state.visible {
            continue;
        }

        let value = session.value(&widget.field);
        if value_is_blank(value) {
            if state.required {
                errors.push(FieldError {
                    field: widget.field.clone(),
                    message: required_message(widget),
                });
            }
            // Nothing else to check against a blank value.
            continue;
        }
        let value = value.unwrap_or(&Value::Null);

        for rule in &widget.validations {
            if let Some(message) = check_rule(rule, value, custom) {
                errors.push(FieldError {
                    field: widget.field.clone(),
                    message,
                });
            }
        }
    }

    errors
}

fn check_rule(rule: &Validation, value: &Value, custom: &CustomValidators) -> Option<String> {
    let failed = match rule.rule {
        // Blank values were handled before rules run.
        ValidationRule::Required => false,
        ValidationRule::Min => match (value.as_f64(), bound_of(rule)) {
            (Some(actual), Some(bound)) => actual < bound,
            _ => false,
        },
        ValidationRule::Max => match (value.as_f64(), bound_of(rule)) {
            (Some(actual), Some(bound)) => actual > bound,
            _ => false,
        },
        ValidationRule::MinLength => match (value.as_str(), bound_of(rule)) {
            (Some(text), Some(bound)) => (text.chars().count() as f64) < bound,
            _ => false,
        },
        ValidationRule::MaxLength => match (value.as_str(), bound_of(rule)) {
            (Some(text), Some(bound)) => (text.chars().count() as f64) > bound,
            _ => false,
        },
        ValidationRule::Pattern => pattern_failed(rule, value),
        ValidationRule::Custom => {
            let Some(name) = rule.validator.as_deref() else {
                return None;
            };
            match custom.run(name, value) {
                Some(Err(message)) => return Some(message),
                // Unknown validators are an authoring concern, not a runtime
                // failure.
                Some(Ok(())) | None => false,
            }
        }
    };

    failed.then(|| rule.message.clone())
}

fn pattern_failed(rule: &Validation, value: &Value) -> bool {
    let Some(pattern) = rule.value.as_ref().and_then(Value::as_str) else {
        return false;
    };
    let Ok(regex) = Regex::new(pattern) else {
        // An unparseable pattern cannot reject anything.
        return false;
    };
    value.as_str().is_some_and(|text| !regex.is_match(text))
}

fn bound_of(rule: &Validation) -> Option<f64> {
    rule.value.as_ref().and_then(Value::as_f64)
}

fn required_message(widget: &Widget) -> String {
    widget
        .validations
        .iter()
        .find(|rule| rule.rule == ValidationRule::Required)
        .map(|rule| rule.message.clone())
        .unwrap_or_else(|| format!("{} is required", widget.label))
}

// Blank for submission purposes: unset, null, empty string, empty array.
// Unlike the dependency engine's isEmpty, false and 0 are real answers here.
fn value_is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        _ => false,
    }
}
