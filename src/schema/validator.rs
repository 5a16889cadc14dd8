use serde_json::Value;

/// Outcome of structural validation. `valid` is true iff `errors` is empty;
/// the error list is ordered by document position and is meant to be shown to
/// the screen author verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Checks a candidate screen-configuration document against the structural
/// invariants required before it may be stored.
///
/// A candidate that is not an object, or lacks an `accordions` array, fails
/// immediately with a single error since nothing deeper can be inspected. All
/// other violations accumulate so the author gets a complete report in one
/// pass. Never fails with a Rust error and has no side effects.
pub fn validate(candidate: &Value) -> ValidationReport {
    let Some(root) = candidate.as_object() else {
        return ValidationReport::from_errors(vec![
            "Screen configuration must be an object".to_string(),
        ]);
    };

    let Some(accordions) = root.get("accordions").and_then(Value::as_array) else {
        return ValidationReport::from_errors(vec![
            "Screen configuration must contain an accordions array".to_string(),
        ]);
    };

    let mut errors = Vec::new();
    for (index, accordion) in accordions.iter().enumerate() {
        validate_accordion(accordion, index, &mut errors);
    }

    ValidationReport::from_errors(errors)
}

fn validate_accordion(accordion: &Value, index: usize, errors: &mut Vec<String>) {
    if !has_text(accordion, "id") {
        errors.push(format!("Accordion at index {index} is missing an id"));
    }
    if !has_text(accordion, "title") {
        errors.push(format!("Accordion at index {index} is missing a title"));
    }

    let accordion_label = label_or_index(accordion, "title", index);
    match accordion.get("sections").and_then(Value::as_array) {
        None => {
            errors.push(format!("Accordion at index {index} is missing sections array"));
        }
        Some(sections) => {
            for (section_index, section) in sections.iter().enumerate() {
                validate_section(section, section_index, &accordion_label, errors);
            }
        }
    }
}

fn validate_section(
    section: &Value,
    index: usize,
    accordion_label: &str,
    errors: &mut Vec<String>,
) {
    if !has_text(section, "id") {
        errors.push(format!(
            "Section at index {index} in accordion {accordion_label} is missing an id"
        ));
    }
    if !has_text(section, "title") {
        errors.push(format!(
            "Section at index {index} in accordion {accordion_label} is missing a title"
        ));
    }
    if !section.get("columns").is_some_and(Value::is_number) {
        errors.push(format!(
            "Section at index {index} in accordion {accordion_label} is missing columns property"
        ));
    }

    let section_label = label_or_index(section, "title", index);
    match section.get("widgets").and_then(Value::as_array) {
        None => {
            errors.push(format!(
                "Section at index {index} in accordion {accordion_label} is missing widgets array"
            ));
        }
        Some(widgets) => {
            for (widget_index, widget) in widgets.iter().enumerate() {
                validate_widget(widget, widget_index, &section_label, errors);
            }
        }
    }
}

fn validate_widget(widget: &Value, index: usize, section_label: &str, errors: &mut Vec<String>) {
    if !has_text(widget, "id") {
        errors.push(format!(
            "Widget at index {index} in section {section_label} is missing an id"
        ));
    }
    if !has_text(widget, "type") {
        errors.push(format!(
            "Widget at index {index} in section {section_label} is missing a type"
        ));
    }
    if !has_text(widget, "field") {
        errors.push(format!(
            "Widget at index {index} in section {section_label} is missing a field"
        ));
    }
    if !has_text(widget, "label") {
        errors.push(format!(
            "Widget at index {index} in section {section_label} is missing a label"
        ));
    }
}

// Mirrors truthiness on the wire: absent, null, and "" all count as missing.
fn has_text(value: &Value, key: &str) -> bool {
    value
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn label_or_index(value: &Value, key: &str, index: usize) -> String {
    match value.get(key).and_then(Value::as_str) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => index.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_object_candidates() {
        let report = validate(&json!([1, 2, 3]));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["Screen configuration must be an object"]
        );
    }

    #[test]
    fn rejects_missing_accordions_array() {
        let report = validate(&json!({"metadata": {}}));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec!["Screen configuration must contain an accordions array"]
        );
    }

    #[test]
    fn empty_accordion_list_is_valid() {
        let report = validate(&json!({"accordions": []}));
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn accumulates_accordion_errors() {
        let report = validate(&json!({"accordions": [{"title": "A"}]}));
        assert!(!report.valid);
        assert!(
            report
                .errors
                .contains(&"Accordion at index 0 is missing an id".to_string())
        );
        assert!(
            report
                .errors
                .contains(&"Accordion at index 0 is missing sections array".to_string())
        );
    }

    #[test]
    fn labels_sections_by_accordion_title_or_index() {
        let report = validate(&json!({
            "accordions": [{
                "id": "acc-1",
                "title": "Policy",
                "sections": [{"id": "sec-1", "widgets": []}]
            }]
        }));
        assert!(
            report
                .errors
                .contains(&"Section at index 0 in accordion Policy is missing a title".to_string())
        );
        assert!(report.errors.contains(
            &"Section at index 0 in accordion Policy is missing columns property".to_string()
        ));

        let untitled = validate(&json!({
            "accordions": [{"id": "acc-1", "sections": [{"id": "s", "title": "S", "columns": 1, "widgets": []}]}]
        }));
        assert!(
            untitled
                .errors
                .contains(&"Accordion at index 0 is missing a title".to_string())
        );
    }

    #[test]
    fn accumulates_all_violations_in_one_pass() {
        // Two missing section titles plus one missing widget id.
        let report = validate(&json!({
            "accordions": [{
                "id": "acc-1",
                "title": "Cover",
                "sections": [
                    {"id": "s1", "columns": 2, "widgets": []},
                    {"id": "s2", "columns": 1, "widgets": [
                        {"type": "text", "field": "name", "label": "Name"}
                    ]}
                ]
            }]
        }));
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 3);
        assert!(
            report
                .errors
                .contains(&"Widget at index 0 in section 1 is missing an id".to_string())
        );
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let report = validate(&json!({
            "accordions": [{"id": "", "title": "A", "sections": []}]
        }));
        assert!(
            report
                .errors
                .contains(&"Accordion at index 0 is missing an id".to_string())
        );
    }
}
