use askama::Template;

use crate::controllers::template::TemplateView;
use super::PageContext;

#[derive(Template)]
#[template(path = "elements/template_form.html")]
pub struct TemplateFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub view: TemplateView,
}

/// Full-page message shown instead of a form when a request is refused.
#[derive(Template)]
#[template(path = "alert.html")]
pub struct AlertTemplate {
    pub app_name: String,
    pub message: String,
}
