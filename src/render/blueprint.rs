use serde_json::{Map, Value, json};

use crate::domain::{Accordion, ScreenConfig, Section, SelectOption, Widget};
use crate::form::{FormSession, ResolvedState};

use super::control::control_for;

/// Builds the render blueprint for a screen: the JSON a host renderer walks
/// to produce actual controls, without binding to any UI toolkit.
///
/// Widgets whose resolved `visible` is false are omitted entirely. Resolved
/// enabled/required state is baked into each widget's props; static controls
/// carry neither.
pub fn render_blueprint(config: &ScreenConfig, session: &FormSession) -> Value {
    json!({
        "accordions": config
            .accordions
            .iter()
            .map(|accordion| accordion_blueprint(accordion, session))
            .collect::<Vec<_>>(),
    })
}

fn accordion_blueprint(accordion: &Accordion, session: &FormSession) -> Value {
    json!({
        "id": accordion.id,
        "title": accordion.title,
        "open": accordion.is_open,
        "sections": accordion
            .sections
            .iter()
            .map(|section| section_blueprint(section, session))
            .collect::<Vec<_>>(),
    })
}

fn section_blueprint(section: &Section, session: &FormSession) -> Value {
    let widgets: Vec<Value> = section
        .widgets
        .iter()
        .filter_map(|widget| {
            let state = session
                .resolved(&widget.id)
                .unwrap_or(ResolvedState::declared(widget));
            state
                .visible
                .then(|| widget_blueprint(widget, state, session.value(&widget.field)))
        })
        .collect();

    json!({
        "id": section.id,
        "title": section.title,
        "columns": section.columns,
        "widgets": widgets,
    })
}

/// Blueprint for a single widget with its resolved state wired into the
/// control's props.
pub fn widget_blueprint(widget: &Widget, state: ResolvedState, value: Option<&Value>) -> Value {
    let control = control_for(widget.widget_type);

    let mut props = Map::new();
    props.insert("id".into(), Value::String(widget.id.clone()));
    props.insert("control".into(), Value::String(control.name().to_string()));
    props.insert("label".into(), Value::String(widget.label.clone()));

    if control.is_static() {
        return Value::Object(props);
    }

    props.insert("field".into(), Value::String(widget.field.clone()));
    props.insert("disabled".into(), Value::Bool(!state.enabled));
    props.insert("required".into(), Value::Bool(state.required));
    props.insert("value".into(), value.cloned().unwrap_or(Value::Null));

    if let Some(placeholder) = &widget.placeholder {
        props.insert("placeholder".into(), Value::String(placeholder.clone()));
    }
    if let Some(helper) = &widget.helper_text {
        props.insert("helperText".into(), Value::String(helper.clone()));
    }
    if !widget.options.is_empty() {
        props.insert(
            "options".into(),
            Value::Array(widget.options.iter().map(option_blueprint).collect()),
        );
    }
    if let Some(min) = widget.min {
        props.insert("min".into(), json!(min));
    }
    if let Some(max) = widget.max {
        props.insert("max".into(), json!(max));
    }
    if !widget.columns.is_empty()
        && let Ok(columns) = serde_json::to_value(&widget.columns)
    {
        props.insert("columns".into(), columns);
    }

    Value::Object(props)
}

fn option_blueprint(option: &SelectOption) -> Value {
    let mut map = Map::new();
    map.insert("value".into(), option.value.clone());
    map.insert("label".into(), Value::String(option.label.clone()));
    if let Some(disabled) = option.disabled {
        map.insert("disabled".into(), Value::Bool(disabled));
    }
    Value::Object(map)
}
