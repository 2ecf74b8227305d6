pub mod active_user;
pub mod category;
pub mod form_value;
pub mod template;
pub mod tmplvar;
