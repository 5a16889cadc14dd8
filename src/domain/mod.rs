mod dependency;
mod document;
mod model;

pub use dependency::{DependencyAction, DependencyCondition, DependencyValue, WidgetDependency};
pub use document::ScreenDocument;
pub use model::{
    Accordion, ColumnKind, ScreenConfig, Section, SelectOption, TableColumn, TableRow, Validation,
    ValidationRule, Widget, WidgetType, generate_id,
};
