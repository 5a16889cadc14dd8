mod resolve;
mod store;
mod validation;

pub use resolve::{DependencyIndex, ResolvedState, resolve, resolve_widget};
pub use store::{FormSession, FormStore, FormValues};
pub use validation::{CustomValidators, FieldError, validate_submission};
