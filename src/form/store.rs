use indexmap::IndexMap;
use serde_json::Value;

use crate::binding::ExtractOutcome;
use crate::domain::{ScreenConfig, Widget};

use super::resolve::{DependencyIndex, ResolvedState, resolve, resolve_widget};

/// Ordered field -> value mapping shared between the store, the evaluator,
/// and callers supplying initial values.
pub type FormValues = IndexMap<String, Value>;

/// Live mapping of field keys to current values for one render or preview
/// session. Owned by exactly one session and discarded with it; never
/// persisted as part of a screen configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormStore {
    values: IndexMap<String, Value>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds initial values from widget defaults.
    pub fn seeded<'a>(widgets: impl IntoIterator<Item = &'a Widget>) -> Self {
        let mut store = Self::new();
        for widget in widgets {
            if let Some(default) = &widget.default_value
                && widget.holds_value()
            {
                store.values.insert(widget.field.clone(), default.clone());
            }
        }
        store
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// Lays externally supplied values over whatever is already present, e.g.
    /// when editing an existing submission.
    pub fn overlay(&mut self, initial: IndexMap<String, Value>) {
        for (field, value) in initial {
            self.values.insert(field, value);
        }
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One active render/preview of a screen: the widget set, the value store,
/// and the resolved per-widget state, kept in sync on every value change.
///
/// All evaluation happens synchronously inside [`FormSession::set_value`];
/// there is no background computation and no hidden state, so two sessions
/// fed the same changes end up identical.
#[derive(Debug, Clone)]
pub struct FormSession {
    widgets: Vec<Widget>,
    store: FormStore,
    index: DependencyIndex,
    resolved: IndexMap<String, ResolvedState>,
    binding_errors: IndexMap<String, String>,
}

impl FormSession {
    pub fn new(config: &ScreenConfig) -> Self {
        Self::with_initial_values(config, IndexMap::new())
    }

    pub fn with_initial_values(config: &ScreenConfig, initial: IndexMap<String, Value>) -> Self {
        let widgets: Vec<Widget> = config.widgets().cloned().collect();
        let mut store = FormStore::seeded(widgets.iter());
        store.overlay(initial);
        let index = DependencyIndex::build(widgets.iter());
        let resolved = resolve(widgets.iter(), store.values());
        Self {
            widgets,
            store,
            index,
            resolved,
            binding_errors: IndexMap::new(),
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget_by_id(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|widget| widget.id == id)
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.store.get(field)
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        self.store.values()
    }

    /// Records a new value for `field` and re-resolves the widgets that
    /// depend on it. Only the widget owning `field` is expected to call this
    /// for that field.
    pub fn set_value(&mut self, field: &str, value: Value) {
        self.store.set(field, value);
        // Only dependents of the changed field can change state; everything
        // else was resolved at construction or by a previous set.
        let dependents: Vec<String> = self.index.dependents_of(field).to_vec();
        for widget_id in dependents {
            if let Some(widget) = self.widgets.iter().find(|w| w.id == widget_id) {
                let state = resolve_widget(widget, self.store.values());
                self.resolved.insert(widget_id, state);
            }
        }
    }

    /// Resolved state for a widget id, if the widget exists in this session.
    pub fn resolved(&self, widget_id: &str) -> Option<ResolvedState> {
        self.resolved.get(widget_id).copied()
    }

    pub fn resolved_states(&self) -> &IndexMap<String, ResolvedState> {
        &self.resolved
    }

    /// Recomputes every widget's state from scratch. `set_value` keeps the
    /// map current incrementally; this exists for callers that mutate the
    /// store wholesale.
    pub fn resolve_all(&mut self) {
        self.resolved = resolve(self.widgets.iter(), self.store.values());
    }

    /// Widget ids whose API binding lists `field` as a refresh trigger.
    pub fn refresh_targets(&self, field: &str) -> Vec<&str> {
        self.widgets
            .iter()
            .filter(|widget| {
                widget
                    .api_binding
                    .as_ref()
                    .is_some_and(|binding| binding.refresh_triggers.iter().any(|t| t == field))
            })
            .map(|widget| widget.id.as_str())
            .collect()
    }

    /// Feeds an extracted API-binding result into the session: options replace
    /// the widget's option list, plain values and table rows land in form
    /// state under the widget's field. Clears any previous binding error for
    /// the widget.
    pub fn apply_binding_outcome(&mut self, widget_id: &str, outcome: ExtractOutcome) {
        self.binding_errors.shift_remove(widget_id);
        let Some(position) = self.widgets.iter().position(|w| w.id == widget_id) else {
            return;
        };
        match outcome {
            ExtractOutcome::Options(options) => {
                self.widgets[position].options = options;
            }
            ExtractOutcome::Value(value) => {
                let field = self.widgets[position].field.clone();
                self.set_value(&field, value);
            }
            ExtractOutcome::Rows(rows) => {
                let field = self.widgets[position].field.clone();
                let value = serde_json::to_value(rows).unwrap_or(Value::Null);
                self.set_value(&field, value);
            }
        }
    }

    /// Fetch failures are flagged per widget, separate from field values, so
    /// the evaluator never sees them. Display is the rendering layer's
    /// concern.
    pub fn set_binding_error(&mut self, widget_id: impl Into<String>, message: impl Into<String>) {
        self.binding_errors.insert(widget_id.into(), message.into());
    }

    pub fn binding_error(&self, widget_id: &str) -> Option<&str> {
        self.binding_errors.get(widget_id).map(String::as_str)
    }
}
