use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::binding::ApiBindingOptions;

use super::dependency::WidgetDependency;

/// Root of a screen definition: an ordered list of accordions plus free-form
/// metadata. An empty accordion list is legal and renders nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    pub accordions: Vec<Accordion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IndexMap<String, Value>>,
}

impl ScreenConfig {
    pub fn empty() -> Self {
        Self {
            accordions: Vec::new(),
            metadata: None,
        }
    }

    /// Starter template used when creating a brand-new screen: one open
    /// accordion holding a single two-column section.
    pub fn starter() -> Self {
        Self {
            accordions: vec![Accordion {
                id: generate_id(),
                title: "New Accordion".to_string(),
                is_open: true,
                sections: vec![Section {
                    id: generate_id(),
                    title: "New Section".to_string(),
                    columns: 2,
                    widgets: Vec::new(),
                }],
            }],
            metadata: Some(IndexMap::new()),
        }
    }

    /// Iterate every widget in document order, across all accordions and
    /// sections. Dependency references are global, so consumers almost always
    /// want the flattened view.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.accordions
            .iter()
            .flat_map(|accordion| accordion.sections.iter())
            .flat_map(|section| section.widgets.iter())
    }

    pub fn widget_by_field(&self, field: &str) -> Option<&Widget> {
        self.widgets().find(|widget| widget.field == field)
    }

    pub fn widget_by_id(&self, id: &str) -> Option<&Widget> {
        self.widgets().find(|widget| widget.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accordion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_open: bool,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Grid column count for widget layout within the section.
    pub columns: u32,
    pub widgets: Vec<Widget>,
}

/// The atomic form field descriptor. `required`/`disabled`/`hidden` are the
/// *declared* defaults; the runtime state a rendered widget actually carries is
/// the evaluator's [`ResolvedState`](crate::form::ResolvedState).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub label: String,
    /// Key under which the widget's value lives in form state. Unique among
    /// value-holding widgets; display-only types are exempt.
    pub field: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Validation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    // Table widget specifics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<TableColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_add_rows: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_delete_rows: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_row_numbers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_totals: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<WidgetDependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_binding: Option<ApiBindingOptions>,
}

impl Widget {
    pub fn new(widget_type: WidgetType, label: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            widget_type,
            label: label.into(),
            field: field.into(),
            required: false,
            disabled: false,
            hidden: false,
            default_value: None,
            validations: Vec::new(),
            options: Vec::new(),
            placeholder: None,
            helper_text: None,
            width: None,
            metadata: None,
            min: None,
            max: None,
            columns: Vec::new(),
            min_rows: None,
            max_rows: None,
            allow_add_rows: None,
            allow_delete_rows: None,
            show_row_numbers: None,
            show_totals: None,
            dependency: None,
            api_binding: None,
        }
    }

    pub fn holds_value(&self) -> bool {
        !self.widget_type.is_display_only()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Text,
    Number,
    Email,
    Password,
    Select,
    Multiselect,
    Checkbox,
    Radio,
    Date,
    Datetime,
    Textarea,
    Table,
    Custom,
    Switch,
    Slider,
    Autocomplete,
    Heading,
    Paragraph,
    Divider,
}

impl WidgetType {
    /// Display-only types hold no value and ignore enabled/required state.
    pub fn is_display_only(self) -> bool {
        matches!(
            self,
            WidgetType::Heading | WidgetType::Paragraph | WidgetType::Divider
        )
    }

    /// Choice-based types draw their choices from `Widget::options`.
    pub fn uses_options(self) -> bool {
        matches!(
            self,
            WidgetType::Select
                | WidgetType::Multiselect
                | WidgetType::Radio
                | WidgetType::Autocomplete
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl SelectOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    #[serde(rename = "type")]
    pub rule: ValidationRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub message: String,
    /// Name of a registered custom validator, only meaningful for
    /// `ValidationRule::Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationRule {
    Required,
    Min,
    Max,
    MinLength,
    MaxLength,
    Pattern,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub header: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Opaque per-row expression for formula columns; never evaluated here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Text,
    Number,
    Select,
    Checkbox,
    Switch,
    Formula,
    String,
    Date,
    Boolean,
    Actions,
}

/// One row of a table widget's value: cells keyed by column id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: String,
    pub cells: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a unique id for new accordions/sections/widgets. Monotonic within
/// a process, seeded from the clock so restarts do not collide in practice.
pub fn generate_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let count = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}{}", to_base36(nanos), to_base36(count))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
