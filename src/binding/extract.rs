use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::domain::{SelectOption, TableRow, generate_id};

use super::config::{ApiConfig, ResponseMapping};

/// Host-implemented transport for API-bound widgets. The engine resolves
/// templates and mappings; the fetcher owns all network I/O.
pub trait DataFetcher {
    fn fetch(&self, config: &ApiConfig) -> Result<Value>;
}

/// What a response mapping yields: an option list, a plain field value, or
/// table rows. Fed back into the session as ordinary state.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractOutcome {
    Options(Vec<SelectOption>),
    Value(Value),
    Rows(Vec<TableRow>),
}

/// Runs a binding: mock response if configured, otherwise the fetcher, with
/// `${field}` templates in the url/params/body substituted from form values
/// first.
pub fn execute(
    config: &ApiConfig,
    values: &IndexMap<String, Value>,
    fetcher: &dyn DataFetcher,
) -> Result<Value> {
    if config.use_mock
        && let Some(mock) = &config.mock_response
    {
        return Ok(mock.clone());
    }
    let resolved = resolve_templates(config, values);
    fetcher
        .fetch(&resolved)
        .with_context(|| format!("binding fetch failed for {}", config.url))
}

/// Applies a response mapping to a raw response. With no mapping section set
/// the raw response passes through as a plain value.
pub fn extract(response: &Value, mapping: &ResponseMapping) -> ExtractOutcome {
    if let Some(options) = &mapping.options {
        let records = value_by_path(response, &options.path)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let extracted = records
            .iter()
            .map(|record| SelectOption {
                value: value_by_path(record, &options.value_field)
                    .cloned()
                    .unwrap_or(Value::Null),
                label: label_text(value_by_path(record, &options.label_field)),
                disabled: None,
            })
            .collect();
        return ExtractOutcome::Options(extracted);
    }

    if let Some(value) = &mapping.value {
        return ExtractOutcome::Value(
            value_by_path(response, &value.path)
                .cloned()
                .unwrap_or(Value::Null),
        );
    }

    if let Some(table) = &mapping.table_data {
        let records = value_by_path(response, &table.path)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let rows = records
            .iter()
            .map(|record| {
                let id = record
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(generate_id);
                let cells = table
                    .columns
                    .iter()
                    .map(|(column_id, data_field)| {
                        (
                            column_id.clone(),
                            value_by_path(record, data_field)
                                .cloned()
                                .unwrap_or(Value::Null),
                        )
                    })
                    .collect();
                TableRow {
                    id,
                    cells,
                    is_valid: None,
                }
            })
            .collect();
        return ExtractOutcome::Rows(rows);
    }

    ExtractOutcome::Value(response.clone())
}

/// Fetch-and-extract dry run for the binding editor: returns the raw
/// response alongside whatever the configured mapping makes of it.
#[derive(Debug, Clone)]
pub struct BindingProbe {
    pub raw: Value,
    pub extracted: Option<ExtractOutcome>,
}

pub fn probe(
    config: &ApiConfig,
    values: &IndexMap<String, Value>,
    fetcher: &dyn DataFetcher,
) -> Result<BindingProbe> {
    let raw = execute(config, values, fetcher)?;
    let extracted = config
        .response_mapping
        .as_ref()
        .map(|mapping| extract(&raw, mapping));
    Ok(BindingProbe { raw, extracted })
}

/// Navigates a value by dot-notation path; numeric segments index arrays.
/// An empty path or a miss at any segment yields `None`.
pub fn value_by_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn resolve_templates(config: &ApiConfig, values: &IndexMap<String, Value>) -> ApiConfig {
    let mut resolved = config.clone();
    resolved.url = substitute(&config.url, values);
    if let Some(params) = &mut resolved.params {
        for value in params.values_mut() {
            substitute_value(value, values);
        }
    }
    if let Some(body) = &mut resolved.body {
        substitute_value(body, values);
    }
    resolved
}

fn substitute_value(target: &mut Value, values: &IndexMap<String, Value>) {
    match target {
        Value::String(text) => *text = substitute(text, values),
        Value::Object(map) => {
            for value in map.values_mut() {
                substitute_value(value, values);
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute_value(item, values);
            }
        }
        _ => {}
    }
}

// ${field} placeholders resolve from form values; unknown fields are left
// verbatim so a miss is visible downstream.
fn substitute(template: &str, values: &IndexMap<String, Value>) -> String {
    let Ok(placeholder) = Regex::new(r"\$\{([^}]+)\}") else {
        return template.to_string();
    };
    placeholder
        .replace_all(template, |captures: &regex::Captures<'_>| {
            let field = &captures[1];
            match values.get(field) {
                Some(value) => label_text(Some(value)),
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

fn label_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
