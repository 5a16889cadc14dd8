mod audit;
mod loader;
mod validator;

pub use audit::{AuditFinding, audit_dependencies};
pub use loader::{load_screen_config, load_screen_document, parse_screen_config_str};
pub use validator::{ValidationReport, validate};
