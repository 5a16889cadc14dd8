use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{
    DependencyAction, DependencyCondition, DependencyValue, Widget, WidgetDependency,
};

/// Runtime state of a widget at a given moment, as opposed to its declared
/// defaults. Derived from form values on every change and never stored as
/// independently-mutable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedState {
    pub visible: bool,
    pub enabled: bool,
    pub required: bool,
}

impl ResolvedState {
    /// The undecorated state of a widget without a dependency.
    pub fn declared(widget: &Widget) -> Self {
        Self {
            visible: !widget.hidden,
            enabled: !widget.disabled,
            required: widget.required,
        }
    }
}

/// Computes the resolved state of every widget given the current form values.
///
/// Resolution is single-level: each widget's state depends only on its own
/// declared dependency, never on the resolved state of its parent, so the
/// pass is O(widgets) with no graph traversal and no cycle risk. Running it
/// twice over identical inputs yields identical output.
pub fn resolve<'a>(
    widgets: impl IntoIterator<Item = &'a Widget>,
    values: &IndexMap<String, Value>,
) -> IndexMap<String, ResolvedState> {
    widgets
        .into_iter()
        .map(|widget| (widget.id.clone(), resolve_widget(widget, values)))
        .collect()
}

/// Resolves a single widget against the current form values.
pub fn resolve_widget(widget: &Widget, values: &IndexMap<String, Value>) -> ResolvedState {
    let state = ResolvedState::declared(widget);

    let Some(dependency) = &widget.dependency else {
        return state;
    };
    // A widget depending on its own field is an authoring mistake; the
    // declared defaults win and the schema audit reports it.
    if widget.holds_value() && dependency.parent_field_id == widget.field {
        return state;
    }

    let parent_value = values.get(&dependency.parent_field_id);
    let met = condition_met(dependency, parent_value);
    apply_action(state, dependency.action, met)
}

fn apply_action(mut state: ResolvedState, action: DependencyAction, met: bool) -> ResolvedState {
    match action {
        DependencyAction::Show => state.visible = met,
        DependencyAction::Hide => state.visible = !met,
        DependencyAction::Enable => state.enabled = met,
        DependencyAction::Disable => state.enabled = !met,
        DependencyAction::Require => state.required = met,
        DependencyAction::Optional => state.required = !met,
    }
    state
}

fn condition_met(dependency: &WidgetDependency, parent: Option<&Value>) -> bool {
    match dependency.condition {
        DependencyCondition::Equals => loose_equals(parent, dependency.value.as_ref()),
        DependencyCondition::NotEquals => !loose_equals(parent, dependency.value.as_ref()),
        DependencyCondition::Contains => contains(parent, dependency.value.as_ref()),
        DependencyCondition::NotContains => !contains(parent, dependency.value.as_ref()),
        DependencyCondition::IsEmpty => is_empty(parent),
        DependencyCondition::IsNotEmpty => !is_empty(parent),
    }
}

// Deliberately loose: both sides are coerced to string so a numeric field
// value still matches a string-typed dependency target.
fn loose_equals(parent: Option<&Value>, target: Option<&DependencyValue>) -> bool {
    let (Some(parent), Some(target)) = (parent, target) else {
        return false;
    };
    coerce_to_string(parent) == target_as_string(target)
}

// Asymmetric on purpose: a sequence target is an exact membership test with
// no coercion, a string target is a substring test against a string parent,
// and every other pairing is false.
fn contains(parent: Option<&Value>, target: Option<&DependencyValue>) -> bool {
    match (parent, target) {
        (Some(parent), Some(DependencyValue::Many(candidates))) => parent
            .as_str()
            .is_some_and(|value| candidates.iter().any(|candidate| candidate == value)),
        (Some(parent), Some(DependencyValue::One(needle))) => parent
            .as_str()
            .is_some_and(|haystack| haystack.contains(needle.as_str())),
        _ => false,
    }
}

// An unset parent, null, false, zero, the empty string, and the empty
// sequence all count as empty. A non-empty object does not.
fn is_empty(parent: Option<&Value>) -> bool {
    match parent {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => !flag,
        Some(Value::Number(number)) => number.as_f64() == Some(0.0),
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(_)) => false,
    }
}

fn target_as_string(target: &DependencyValue) -> String {
    match target {
        DependencyValue::One(text) => text.clone(),
        DependencyValue::Many(items) => items.join(","),
    }
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => format_number(number),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(coerce_to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn format_number(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(float) = number.as_f64() {
        if float.fract() == 0.0 && float.abs() < 1e15 {
            return format!("{}", float as i64);
        }
        return float.to_string();
    }
    number.to_string()
}

/// Index of dependent widget ids keyed by the controlling field. Lets a form
/// session re-resolve only the widgets affected by a change; using it never
/// alters observable behavior since resolution is per-widget.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    by_parent: HashMap<String, Vec<String>>,
}

impl DependencyIndex {
    pub fn build<'a>(widgets: impl IntoIterator<Item = &'a Widget>) -> Self {
        let mut by_parent: HashMap<String, Vec<String>> = HashMap::new();
        for widget in widgets {
            if let Some(dependency) = &widget.dependency {
                by_parent
                    .entry(dependency.parent_field_id.clone())
                    .or_default()
                    .push(widget.id.clone());
            }
        }
        Self { by_parent }
    }

    pub fn dependents_of(&self, field: &str) -> &[String] {
        self.by_parent
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WidgetType;
    use serde_json::json;

    fn values(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect()
    }

    fn widget_with(dependency: WidgetDependency) -> Widget {
        let mut widget = Widget::new(WidgetType::Text, "Dependent", "dependent");
        widget.dependency = Some(dependency);
        widget
    }

    fn rule(
        parent: &str,
        condition: DependencyCondition,
        value: Option<DependencyValue>,
        action: DependencyAction,
    ) -> WidgetDependency {
        WidgetDependency {
            parent_field_id: parent.to_string(),
            condition,
            value,
            action,
        }
    }

    #[test]
    fn widgets_without_dependencies_keep_declared_state() {
        let mut widget = Widget::new(WidgetType::Text, "Plain", "plain");
        widget.hidden = true;
        widget.required = true;
        let state = resolve_widget(&widget, &values(&[("anything", json!("x"))]));
        assert_eq!(
            state,
            ResolvedState {
                visible: false,
                enabled: true,
                required: true
            }
        );
    }

    #[test]
    fn equals_show_follows_parent_value() {
        let widget = widget_with(rule(
            "contactMethod",
            DependencyCondition::Equals,
            Some("email".into()),
            DependencyAction::Show,
        ));
        let shown = resolve_widget(&widget, &values(&[("contactMethod", json!("email"))]));
        assert!(shown.visible);
        let hidden = resolve_widget(&widget, &values(&[("contactMethod", json!("phone"))]));
        assert!(!hidden.visible);
        // Unset parent never equals anything.
        let unset = resolve_widget(&widget, &values(&[]));
        assert!(!unset.visible);
    }

    #[test]
    fn equals_coerces_numbers_to_strings() {
        let widget = widget_with(rule(
            "vehicleCount",
            DependencyCondition::Equals,
            Some("3".into()),
            DependencyAction::Show,
        ));
        let state = resolve_widget(&widget, &values(&[("vehicleCount", json!(3))]));
        assert!(state.visible);
        let float = resolve_widget(&widget, &values(&[("vehicleCount", json!(3.0))]));
        assert!(float.visible);
    }

    #[test]
    fn not_equals_is_exact_negation() {
        let widget = widget_with(rule(
            "state",
            DependencyCondition::NotEquals,
            Some("CA".into()),
            DependencyAction::Hide,
        ));
        let matching = resolve_widget(&widget, &values(&[("state", json!("CA"))]));
        assert!(matching.visible);
        let differing = resolve_widget(&widget, &values(&[("state", json!("NY"))]));
        assert!(!differing.visible);
    }

    #[test]
    fn contains_sequence_target_is_exact_membership() {
        let widget = widget_with(rule(
            "tags",
            DependencyCondition::Contains,
            Some(vec!["urgent", "vip"].into()),
            DependencyAction::Enable,
        ));
        let member = resolve_widget(&widget, &values(&[("tags", json!("vip"))]));
        assert!(member.enabled);
        let outsider = resolve_widget(&widget, &values(&[("tags", json!("normal"))]));
        assert!(!outsider.enabled);
        // No coercion in the membership branch.
        let number = resolve_widget(&widget, &values(&[("tags", json!(1))]));
        assert!(!number.enabled);
    }

    #[test]
    fn contains_string_target_is_substring() {
        let widget = widget_with(rule(
            "notes",
            DependencyCondition::Contains,
            Some("claim".into()),
            DependencyAction::Show,
        ));
        let hit = resolve_widget(&widget, &values(&[("notes", json!("prior claim on file"))]));
        assert!(hit.visible);
        let miss = resolve_widget(&widget, &values(&[("notes", json!("clean record"))]));
        assert!(!miss.visible);
        let non_string = resolve_widget(&widget, &values(&[("notes", json!(42))]));
        assert!(!non_string.visible);
    }

    #[test]
    fn not_contains_negates_each_branch() {
        let widget = widget_with(rule(
            "tags",
            DependencyCondition::NotContains,
            Some(vec!["urgent"].into()),
            DependencyAction::Show,
        ));
        let member = resolve_widget(&widget, &values(&[("tags", json!("urgent"))]));
        assert!(!member.visible);
        let outsider = resolve_widget(&widget, &values(&[("tags", json!("routine"))]));
        assert!(outsider.visible);
    }

    #[test]
    fn is_empty_and_is_not_empty_are_complements() {
        let candidates = [
            json!(null),
            json!(false),
            json!(true),
            json!(0),
            json!(7),
            json!(""),
            json!("x"),
            json!([]),
            json!(["a"]),
            json!({}),
        ];
        for candidate in &candidates {
            let probe = values(&[("qty", candidate.clone())]);
            let empty = condition_met(
                &rule("qty", DependencyCondition::IsEmpty, None, DependencyAction::Show),
                probe.get("qty"),
            );
            let not_empty = condition_met(
                &rule(
                    "qty",
                    DependencyCondition::IsNotEmpty,
                    None,
                    DependencyAction::Show,
                ),
                probe.get("qty"),
            );
            assert_ne!(empty, not_empty, "complement broken for {candidate}");
        }
    }

    #[test]
    fn require_action_tracks_condition() {
        let widget = widget_with(rule(
            "qty",
            DependencyCondition::IsNotEmpty,
            None,
            DependencyAction::Require,
        ));
        let blank = resolve_widget(&widget, &values(&[("qty", json!(""))]));
        assert!(!blank.required);
        let filled = resolve_widget(&widget, &values(&[("qty", json!("3"))]));
        assert!(filled.required);
    }

    #[test]
    fn optional_action_inverts_condition() {
        let widget = widget_with(rule(
            "hasAgent",
            DependencyCondition::Equals,
            Some("yes".into()),
            DependencyAction::Optional,
        ));
        let met = resolve_widget(&widget, &values(&[("hasAgent", json!("yes"))]));
        assert!(!met.required);
        let unmet = resolve_widget(&widget, &values(&[("hasAgent", json!("no"))]));
        assert!(unmet.required);
    }

    #[test]
    fn dangling_parent_degrades_silently() {
        let widget = widget_with(rule(
            "nonexistent",
            DependencyCondition::IsEmpty,
            None,
            DependencyAction::Hide,
        ));
        // Missing parent value is empty, so hide fires.
        let state = resolve_widget(&widget, &values(&[]));
        assert!(!state.visible);
    }

    #[test]
    fn self_reference_is_ignored() {
        let mut widget = Widget::new(WidgetType::Text, "Loop", "loop");
        widget.dependency = Some(rule(
            "loop",
            DependencyCondition::IsNotEmpty,
            None,
            DependencyAction::Hide,
        ));
        let state = resolve_widget(&widget, &values(&[("loop", json!("set"))]));
        assert!(state.visible);
    }

    #[test]
    fn resolve_is_idempotent() {
        let parent = Widget::new(WidgetType::Radio, "Contact", "contactMethod");
        let child = widget_with(rule(
            "contactMethod",
            DependencyCondition::Equals,
            Some("email".into()),
            DependencyAction::Show,
        ));
        let widgets = vec![parent, child];
        let form = values(&[("contactMethod", json!("email"))]);
        let first = resolve(widgets.iter(), &form);
        let second = resolve(widgets.iter(), &form);
        assert_eq!(first, second);
    }

    #[test]
    fn index_tracks_dependents_by_parent_field() {
        let parent = Widget::new(WidgetType::Radio, "Contact", "contactMethod");
        let child = widget_with(rule(
            "contactMethod",
            DependencyCondition::Equals,
            Some("email".into()),
            DependencyAction::Show,
        ));
        let child_id = child.id.clone();
        let index = DependencyIndex::build([&parent, &child]);
        assert_eq!(index.dependents_of("contactMethod"), &[child_id]);
        assert!(index.dependents_of("other").is_empty());
    }
}
