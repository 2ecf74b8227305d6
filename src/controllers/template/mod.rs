//! Template edit/create controller.
//!
//! [`TemplateController::render`] runs one request: the [`can_view`] gate,
//! [`TemplateController::check_locked`], then [`TemplateController::parameters`],
//! which loads the template, splits its TV bindings and reads the catalog
//! listings for the form.

mod context;
mod controller;
mod partition;

pub use context::*;
pub use controller::*;
pub use partition::*;
