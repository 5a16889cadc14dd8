use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::domain::{ScreenConfig, ScreenDocument};
use crate::io::{DocumentFormat, parse_document_str};

use super::validator::validate;

/// Deserializes a screen configuration after structural validation. Legacy
/// document shapes are normalized first so only one canonical model exists
/// past this point.
pub fn load_screen_config(value: &Value) -> Result<ScreenConfig> {
    let report = validate(value);
    if !report.valid {
        bail!(
            "screen configuration failed validation: {}",
            report.errors.join("; ")
        );
    }
    let normalized = normalize_legacy(value.clone());
    serde_json::from_value(normalized).context("failed to deserialize screen configuration")
}

/// Parse and load a screen configuration from raw text in any supported
/// format.
pub fn parse_screen_config_str(contents: &str, format: DocumentFormat) -> Result<ScreenConfig> {
    let value = parse_document_str(contents, format)?;
    load_screen_config(&value)
}

/// Loads a persisted screen document, validating the embedded `config` before
/// accepting the envelope.
pub fn load_screen_document(value: &Value) -> Result<ScreenDocument> {
    let config = value
        .get("config")
        .context("screen document is missing its config")?;
    let report = validate(config);
    if !report.valid {
        bail!(
            "screen document config failed validation: {}",
            report.errors.join("; ")
        );
    }
    let mut normalized = value.clone();
    if let Some(slot) = normalized.get_mut("config") {
        *slot = normalize_legacy(slot.clone());
    }
    serde_json::from_value(normalized).context("failed to deserialize screen document")
}

// Older documents carried `headerName` on table columns where newer ones use
// `header`. Migrate once here instead of tolerating both shapes everywhere.
fn normalize_legacy(mut value: Value) -> Value {
    if let Some(accordions) = value.get_mut("accordions").and_then(Value::as_array_mut) {
        for accordion in accordions {
            let Some(sections) = accordion.get_mut("sections").and_then(Value::as_array_mut)
            else {
                continue;
            };
            for section in sections {
                let Some(widgets) = section.get_mut("widgets").and_then(Value::as_array_mut)
                else {
                    continue;
                };
                for widget in widgets {
                    normalize_widget(widget);
                }
            }
        }
    }
    value
}

fn normalize_widget(widget: &mut Value) {
    let Some(columns) = widget.get_mut("columns").and_then(Value::as_array_mut) else {
        return;
    };
    for column in columns {
        let Some(map) = column.as_object_mut() else {
            continue;
        };
        if !map.contains_key("header")
            && let Some(legacy) = map.remove("headerName")
        {
            map.insert("header".to_string(), legacy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_rejects_invalid_configs() {
        let err = load_screen_config(&json!({"accordions": [{"title": "A"}]})).unwrap_err();
        assert!(err.to_string().contains("missing an id"));
    }

    #[test]
    fn load_accepts_valid_configs() {
        let config = load_screen_config(&json!({
            "accordions": [{
                "id": "acc-1",
                "title": "Applicant",
                "isOpen": true,
                "sections": [{
                    "id": "sec-1",
                    "title": "Identity",
                    "columns": 2,
                    "widgets": [{
                        "id": "w-1",
                        "type": "text",
                        "label": "Full Name",
                        "field": "fullName"
                    }]
                }]
            }]
        }))
        .unwrap();
        assert_eq!(config.accordions[0].sections[0].widgets[0].field, "fullName");
    }

    #[test]
    fn migrates_legacy_header_name_columns() {
        let config = load_screen_config(&json!({
            "accordions": [{
                "id": "a", "title": "A",
                "sections": [{
                    "id": "s", "title": "S", "columns": 1,
                    "widgets": [{
                        "id": "w", "type": "table", "label": "Drivers", "field": "drivers",
                        "columns": [{"id": "age", "headerName": "Age", "type": "number"}]
                    }]
                }]
            }]
        }))
        .unwrap();
        let widget = &config.accordions[0].sections[0].widgets[0];
        assert_eq!(widget.columns[0].header, "Age");
    }

    #[test]
    fn document_envelope_round_trips() {
        let raw = json!({
            "id": "doc-1",
            "screenKey": "auto-quote",
            "screenName": "Auto Quote",
            "config": {"accordions": []},
            "isActive": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        });
        let document = load_screen_document(&raw).unwrap();
        assert_eq!(document.screen_key, "auto-quote");
        assert_eq!(serde_json::to_value(&document).unwrap(), raw);
    }
}
