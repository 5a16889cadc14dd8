mod blueprint;
mod control;

pub use blueprint::{render_blueprint, widget_blueprint};
pub use control::{ControlKind, control_for};
