use std::collections::HashSet;

use crate::domain::ScreenConfig;

/// A non-fatal authoring problem found in a screen's widget graph. The
/// runtime degrades silently on these; editors should surface them before
/// save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFinding {
    pub widget_id: String,
    pub message: String,
}

/// Inspects the widget graph for mistakes the structural validator does not
/// reject: dangling or self-referential dependencies, conditions missing
/// their comparison value, and id/field collisions.
pub fn audit_dependencies(config: &ScreenConfig) -> Vec<AuditFinding> {
    let mut findings = Vec::new();

    let known_fields: HashSet<&str> = config
        .widgets()
        .filter(|widget| widget.holds_value())
        .map(|widget| widget.field.as_str())
        .collect();

    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut seen_fields: HashSet<&str> = HashSet::new();

    for widget in config.widgets() {
        if !seen_ids.insert(widget.id.as_str()) {
            findings.push(AuditFinding {
                widget_id: widget.id.clone(),
                message: format!("duplicate widget id '{}'", widget.id),
            });
        }
        if widget.holds_value() && !seen_fields.insert(widget.field.as_str()) {
            findings.push(AuditFinding {
                widget_id: widget.id.clone(),
                message: format!("duplicate field '{}'", widget.field),
            });
        }

        let Some(dependency) = &widget.dependency else {
            continue;
        };

        if dependency.parent_field_id == widget.field {
            findings.push(AuditFinding {
                widget_id: widget.id.clone(),
                message: format!(
                    "widget '{}' depends on its own field '{}'",
                    widget.id, widget.field
                ),
            });
        } else if !known_fields.contains(dependency.parent_field_id.as_str()) {
            findings.push(AuditFinding {
                widget_id: widget.id.clone(),
                message: format!(
                    "dependency references unknown field '{}'",
                    dependency.parent_field_id
                ),
            });
        }

        if dependency.condition.takes_value() && dependency.value.is_none() {
            findings.push(AuditFinding {
                widget_id: widget.id.clone(),
                message: format!(
                    "condition {:?} requires a comparison value",
                    dependency.condition
                ),
            });
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Accordion, DependencyAction, DependencyCondition, Section, Widget, WidgetDependency,
        WidgetType,
    };

    fn screen_with(widgets: Vec<Widget>) -> ScreenConfig {
        ScreenConfig {
            accordions: vec![Accordion {
                id: "a".into(),
                title: "A".into(),
                is_open: true,
                sections: vec![Section {
                    id: "s".into(),
                    title: "S".into(),
                    columns: 1,
                    widgets,
                }],
            }],
            metadata: None,
        }
    }

    fn depend_on(field: &str) -> WidgetDependency {
        WidgetDependency {
            parent_field_id: field.to_string(),
            condition: DependencyCondition::Equals,
            value: Some("yes".into()),
            action: DependencyAction::Show,
        }
    }

    #[test]
    fn flags_dangling_parent_references() {
        let mut dependent = Widget::new(WidgetType::Text, "Details", "details");
        dependent.dependency = Some(depend_on("missingField"));
        let findings = audit_dependencies(&screen_with(vec![dependent]));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("unknown field 'missingField'"));
    }

    #[test]
    fn flags_self_references() {
        let mut widget = Widget::new(WidgetType::Text, "Loop", "loop");
        widget.dependency = Some(depend_on("loop"));
        let findings = audit_dependencies(&screen_with(vec![widget]));
        assert!(findings[0].message.contains("depends on its own field"));
    }

    #[test]
    fn flags_missing_comparison_values() {
        let parent = Widget::new(WidgetType::Text, "Parent", "parent");
        let mut child = Widget::new(WidgetType::Text, "Child", "child");
        child.dependency = Some(WidgetDependency {
            parent_field_id: "parent".to_string(),
            condition: DependencyCondition::Contains,
            value: None,
            action: DependencyAction::Show,
        });
        let findings = audit_dependencies(&screen_with(vec![parent, child]));
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("requires a comparison value"));
    }

    #[test]
    fn clean_screens_produce_no_findings() {
        let parent = Widget::new(WidgetType::Radio, "Contact", "contactMethod");
        let mut child = Widget::new(WidgetType::Email, "Email", "emailAddress");
        child.dependency = Some(depend_on("contactMethod"));
        assert!(audit_dependencies(&screen_with(vec![parent, child])).is_empty());
    }

    #[test]
    fn display_widgets_may_share_fields() {
        let heading_a = Widget::new(WidgetType::Heading, "Part One", "");
        let heading_b = Widget::new(WidgetType::Heading, "Part Two", "");
        let findings = audit_dependencies(&screen_with(vec![heading_a, heading_b]));
        assert!(findings.iter().all(|f| !f.message.contains("duplicate field")));
    }
}
