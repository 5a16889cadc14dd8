#![deny(rust_2018_idioms)]

pub mod binding;
pub mod domain;
pub mod form;
pub mod io;
pub mod registry;
pub mod render;
pub mod schema;

pub use domain::{
    Accordion, DependencyAction, DependencyCondition, DependencyValue, ScreenConfig,
    ScreenDocument, Section, SelectOption, Validation, ValidationRule, Widget, WidgetDependency,
    WidgetType,
};
pub use form::{FormSession, FormStore, FormValues, ResolvedState, resolve};
pub use io::{DocumentFormat, OutputDestination, OutputOptions, emit, parse_document_str};
pub use registry::{InMemoryRegistry, RegistryError, ScreenDraft, ScreenRegistry};
pub use render::{ControlKind, render_blueprint};
pub use schema::{
    ValidationReport, audit_dependencies, load_screen_config, load_screen_document, validate,
};

pub mod prelude {
    pub use super::{
        FormSession, FormStore, ResolvedState, ScreenConfig, ScreenDocument, ValidationReport,
        Widget, render_blueprint, resolve, validate,
    };
}
