use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::errors::AppError;
use crate::events::{EventBus, EventOutputs, EventPayload, TEMPLATE_FORM_EVENTS, run_events};
use crate::lexicon::{Lexicon, interpolate};
use crate::models::active_user::LOCK_SCOPE_TEMPLATE;
use crate::models::category::{Category, CategoryWithTvs};
use crate::models::template::Template;
use crate::models::tmplvar::TmplVar;
use crate::store::{Catalog, LockRegistry, TemplateStore};

use super::context::{RequestContext, can_view, required_permission};
use super::partition::partition;

/// Collaborators of the template controller, shared across requests.
#[derive(Clone)]
pub struct TemplateServices {
    pub store: Arc<dyn TemplateStore>,
    pub catalog: Arc<dyn Catalog>,
    pub locks: Arc<dyn LockRegistry>,
    pub lexicon: Arc<dyn Lexicon>,
    pub events: Arc<dyn EventBus>,
    /// Role allowed to open templates flagged as locked.
    pub privileged_role: i64,
}

/// Result of a controller step that may end the request with a message
/// for the user instead of a form.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    /// The requested template does not exist.
    NotFound { message: String },
    /// The template is locked against the acting user.
    LockConflict { message: String },
    /// Another user currently holds the edit lock.
    Busy { message: String },
}

impl<T> Outcome<T> {
    /// Split off the ready value; any other outcome is carried over as is.
    fn into_ready<U>(self) -> Result<T, Outcome<U>> {
        match self {
            Outcome::Ready(value) => Ok(value),
            Outcome::NotFound { message } => Err(Outcome::NotFound { message }),
            Outcome::LockConflict { message } => Err(Outcome::LockConflict { message }),
            Outcome::Busy { message } => Err(Outcome::Busy { message }),
        }
    }
}

/// A template ready for the form, plus the name the manager shows for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTemplate {
    pub template: Template,
    /// Stored name for existing templates (before posted values are
    /// applied), "new template" label otherwise.
    pub item_name: String,
}

/// Everything the template form renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateView {
    pub data: Template,
    pub categories: Vec<Category>,
    pub tv_selected: BTreeSet<i64>,
    pub categories_with_tv: Vec<CategoryWithTvs>,
    pub tv_out_category: Vec<TmplVar>,
    pub action: i64,
    pub events: EventOutputs,
    pub item_name: String,
}

impl TemplateView {
    pub fn is_selected(&self, tv_id: i64) -> bool {
        self.tv_selected.contains(&tv_id)
    }

    /// Whether the TV is bound to the template being edited.
    pub fn is_assigned(&self, tv: &TmplVar) -> bool {
        self.data.exists && tv.is_used_by(self.data.id)
    }

    pub fn event(&self, name: &str) -> &str {
        self.events.get(name).unwrap_or("")
    }
}

/// Edit/create controller for templates.
pub struct TemplateController<'a> {
    services: &'a TemplateServices,
    ctx: RequestContext,
}

impl<'a> TemplateController<'a> {
    pub fn new(services: &'a TemplateServices, ctx: RequestContext) -> Self {
        Self { services, ctx }
    }

    /// Permission gate for the current action. Must pass before anything else runs.
    pub fn can_view(&self) -> bool {
        can_view(self.ctx.action, &self.ctx.permissions)
    }

    /// Message naming another user who is editing this template, if any.
    pub async fn check_locked(&self) -> Result<Option<String>, AppError> {
        let holder = self
            .services
            .locks
            .locked_by(LOCK_SCOPE_TEMPLATE, self.ctx.element_id, self.ctx.user_id)
            .await?;
        Ok(holder.map(|username| {
            log::info!(
                "Template {} is being edited by {username}",
                self.ctx.element_id
            );
            interpolate(&self.services.lexicon.get("error_element_locked"), &username)
        }))
    }

    /// Resolve the template for the form: a fresh one for id 0, the stored
    /// one otherwise, with posted values applied on top.
    pub async fn load(&self) -> Result<Outcome<LoadedTemplate>, AppError> {
        let id = self.ctx.element_id;
        let lexicon = &self.services.lexicon;

        let (mut template, item_name) = if id > 0 {
            let Some(template) = self.services.store.find_with_tvs(id).await? else {
                log::warn!("Template {id} not found");
                return Ok(Outcome::NotFound {
                    message: lexicon.get("error_template_not_found"),
                });
            };
            if template.locked && self.ctx.role != self.services.privileged_role {
                log::warn!(
                    "User {} (role {}) refused locked template {id}",
                    self.ctx.user_id,
                    self.ctx.role
                );
                return Ok(Outcome::LockConflict {
                    message: lexicon.get("error_no_privileges"),
                });
            }
            let name = template.templatename.clone();
            (template, name)
        } else {
            let category = self.ctx.catid.unwrap_or(0);
            (Template::new_in_category(category), lexicon.get("new_template"))
        };

        if let Some(values) = self.ctx.posted.as_ref().filter(|v| !v.is_empty()) {
            log::debug!("Applying {} posted value(s) to template {id}", values.len());
            template.fill(values);
        }

        Ok(Outcome::Ready(LoadedTemplate { template, item_name }))
    }

    /// Fire the form events for this template.
    pub async fn run_events(&self) -> Result<EventOutputs, AppError> {
        let payload = EventPayload {
            id: self.ctx.element_id,
            action: self.ctx.action,
        };
        run_events(self.services.events.as_ref(), &TEMPLATE_FORM_EVENTS, &payload).await
    }

    /// Assemble the full view model for the template form.
    pub async fn parameters(&self) -> Result<Outcome<TemplateView>, AppError> {
        let LoadedTemplate { template, item_name } = match self.load().await?.into_ready() {
            Ok(loaded) => loaded,
            Err(outcome) => return Ok(outcome),
        };

        let catalog = &self.services.catalog;
        let split = partition(&template.tvs);
        let categories = catalog.list_categories().await?;
        let categories_with_tv = catalog.list_categories_with_tvs(&split.ungrouped_ids()).await?;
        let tv_out_category = catalog.list_ungrouped_tvs(&split.grouped_ids()).await?;
        let events = self.run_events().await?;

        Ok(Outcome::Ready(TemplateView {
            data: template,
            categories,
            tv_selected: self.ctx.selected_tvs(),
            categories_with_tv,
            tv_out_category,
            action: self.ctx.action,
            events,
            item_name,
        }))
    }

    /// Whole form request: permission gate, edit lock, then the view.
    ///
    /// A refused gate returns before any storage or event bus call.
    pub async fn render(&self) -> Result<Outcome<TemplateView>, AppError> {
        if !self.can_view() {
            let code = required_permission(self.ctx.action).unwrap_or("unknown_action");
            return Err(AppError::PermissionDenied(code.to_string()));
        }
        if let Some(message) = self.check_locked().await? {
            return Ok(Outcome::Busy { message });
        }
        self.parameters().await
    }
}
