pub mod template_handlers;

/// Display name of the manager, shown in page titles.
pub struct AppName(pub String);
