use serde::{Deserialize, Serialize};

/// A conditional-visibility rule keyed off another widget's value. Exactly one
/// per widget; there are no boolean-combined rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDependency {
    /// The `field` of the controlling widget. References are global across the
    /// whole screen, not scoped to a section or accordion.
    pub parent_field_id: String,
    pub condition: DependencyCondition,
    /// Required for equals/notEquals/contains/notContains, absent for
    /// isEmpty/isNotEmpty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DependencyValue>,
    pub action: DependencyAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyCondition {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
}

impl DependencyCondition {
    /// Whether the condition compares against a target value at all.
    pub fn takes_value(self) -> bool {
        !matches!(
            self,
            DependencyCondition::IsEmpty | DependencyCondition::IsNotEmpty
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyAction {
    Show,
    Hide,
    Enable,
    Disable,
    Require,
    Optional,
}

/// Target of a dependency comparison. The wire format is either a bare string
/// or an array of strings; modelling it as a tagged variant keeps the
/// evaluator's branches exhaustive instead of duck-typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for DependencyValue {
    fn from(value: &str) -> Self {
        DependencyValue::One(value.to_string())
    }
}

impl From<Vec<&str>> for DependencyValue {
    fn from(values: Vec<&str>) -> Self {
        DependencyValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_and_many_targets_round_trip() {
        let single: WidgetDependency = serde_json::from_value(json!({
            "parentFieldId": "contactMethod",
            "condition": "equals",
            "value": "email",
            "action": "show"
        }))
        .unwrap();
        assert_eq!(single.value, Some(DependencyValue::One("email".into())));

        let many: WidgetDependency = serde_json::from_value(json!({
            "parentFieldId": "tags",
            "condition": "contains",
            "value": ["urgent", "vip"],
            "action": "enable"
        }))
        .unwrap();
        assert_eq!(
            many.value,
            Some(DependencyValue::Many(vec![
                "urgent".to_string(),
                "vip".to_string()
            ]))
        );
    }

    #[test]
    fn empty_conditions_take_no_value() {
        assert!(!DependencyCondition::IsEmpty.takes_value());
        assert!(!DependencyCondition::IsNotEmpty.takes_value());
        assert!(DependencyCondition::Equals.takes_value());
        assert!(DependencyCondition::NotContains.takes_value());
    }
}
