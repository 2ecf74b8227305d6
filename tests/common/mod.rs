//! Shared test infrastructure for controller tests.
//!
//! In-memory stand-ins for every collaborator of the template controller:
//! - `MemoryStore` - templates, TVs, categories and edit locks
//! - `ScriptedBus` - event bus answering from a script and recording calls

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cms_manager::auth::session::Permissions;
use cms_manager::controllers::template::{RequestContext, TemplateServices};
use cms_manager::errors::AppError;
use cms_manager::events::{EventBus, EventPayload, EventResponse};
use cms_manager::lexicon::StaticLexicon;
use cms_manager::models::category::{Category, CategoryWithTvs, group_by_category};
use cms_manager::models::template::Template;
use cms_manager::models::tmplvar::{TemplateRef, TmplVar, attach_templates};
use cms_manager::store::{Catalog, LockRegistry, TemplateStore};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_ROLE: i64 = 1;
pub const EDITOR_ROLE: i64 = 2;
pub const ME: i64 = 100;

// ============================================================================
// STORAGE
// ============================================================================

pub struct EditLock {
    pub element_type: i64,
    pub element_id: i64,
    pub user_id: i64,
    pub username: String,
}

/// Storage fake. Templates are kept without TVs; bindings attach them on load.
#[derive(Default)]
pub struct MemoryStore {
    pub templates: Vec<Template>,
    pub tvs: Vec<TmplVar>,
    /// (tv id, template id) in binding order.
    pub bindings: Vec<(i64, i64)>,
    pub categories: Vec<Category>,
    pub locks: Vec<EditLock>,
    /// Exclusion lists received by the catalog, tagged by listing.
    pub excludes: Mutex<Vec<(&'static str, Vec<i64>)>>,
    pub catalog_calls: Mutex<usize>,
    pub store_calls: Mutex<usize>,
    pub lock_calls: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    pub fn with_tv(mut self, id: i64, name: &str, category: i64) -> Self {
        self.tvs.push(tv(id, name, category));
        self
    }

    pub fn bind(mut self, tv_id: i64, template_id: i64) -> Self {
        self.bindings.push((tv_id, template_id));
        self
    }

    pub fn with_category(mut self, id: i64, name: &str, rank: i64) -> Self {
        self.categories.push(Category { id, category: name.to_string(), rank });
        self
    }

    pub fn with_lock(mut self, element_id: i64, user_id: i64, username: &str) -> Self {
        self.locks.push(EditLock {
            element_type: 16,
            element_id,
            user_id,
            username: username.to_string(),
        });
        self
    }

    pub fn excludes_for(&self, listing: &str) -> Option<Vec<i64>> {
        self.excludes
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| *name == listing)
            .map(|(_, ids)| ids.clone())
    }

    pub fn catalog_call_count(&self) -> usize {
        *self.catalog_calls.lock().unwrap()
    }

    pub fn store_call_count(&self) -> usize {
        *self.store_calls.lock().unwrap()
    }

    pub fn lock_call_count(&self) -> usize {
        *self.lock_calls.lock().unwrap()
    }

    fn record(&self, listing: &'static str, exclude: &[i64]) {
        *self.catalog_calls.lock().unwrap() += 1;
        self.excludes.lock().unwrap().push((listing, exclude.to_vec()));
    }

    fn refs(&self) -> Vec<TemplateRef> {
        self.bindings
            .iter()
            .map(|&(tmplvarid, templateid)| TemplateRef { tmplvarid, templateid })
            .collect()
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn find_with_tvs(&self, id: i64) -> Result<Option<Template>, AppError> {
        *self.store_calls.lock().unwrap() += 1;
        let Some(stored) = self.templates.iter().find(|t| t.id == id) else {
            return Ok(None);
        };
        let mut template = stored.clone();
        template.exists = true;
        template.tvs = self
            .bindings
            .iter()
            .filter(|(_, tpl)| *tpl == id)
            .filter_map(|(tv_id, _)| self.tvs.iter().find(|tv| tv.id == *tv_id).cloned())
            .collect();
        Ok(Some(template))
    }
}

#[async_trait]
impl Catalog for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        *self.catalog_calls.lock().unwrap() += 1;
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.category.cmp(&b.category)));
        Ok(categories)
    }

    async fn list_ungrouped_tvs(&self, exclude: &[i64]) -> Result<Vec<TmplVar>, AppError> {
        self.record("ungrouped", exclude);
        let mut tvs: Vec<TmplVar> = self
            .tvs
            .iter()
            .filter(|tv| tv.category == 0 && !exclude.contains(&tv.id))
            .cloned()
            .collect();
        tvs.sort_by(|a, b| a.name.cmp(&b.name));
        attach_templates(&mut tvs, &self.refs());
        Ok(tvs)
    }

    async fn list_categories_with_tvs(
        &self,
        exclude: &[i64],
    ) -> Result<Vec<CategoryWithTvs>, AppError> {
        self.record("categorized", exclude);
        let mut categories: Vec<Category> = self
            .categories
            .iter()
            .filter(|c| {
                self.tvs
                    .iter()
                    .any(|tv| tv.category == c.id && !exclude.contains(&tv.id))
            })
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));
        let mut tvs = self.tvs.clone();
        tvs.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.name.cmp(&b.name)));
        attach_templates(&mut tvs, &self.refs());
        Ok(group_by_category(categories, tvs))
    }
}

#[async_trait]
impl LockRegistry for MemoryStore {
    async fn locked_by(
        &self,
        scope: i64,
        element_id: i64,
        except_user: i64,
    ) -> Result<Option<String>, AppError> {
        *self.lock_calls.lock().unwrap() += 1;
        Ok(self
            .locks
            .iter()
            .find(|l| {
                l.element_type == scope && l.element_id == element_id && l.user_id != except_user
            })
            .map(|l| l.username.clone()))
    }
}

// ============================================================================
// EVENT BUS
// ============================================================================

/// Event bus answering from a fixed script; unscripted events get `None`.
#[derive(Default)]
pub struct ScriptedBus {
    pub script: HashMap<String, EventResponse>,
    pub fail_on: Option<String>,
    pub calls: Mutex<Vec<(String, i64, i64)>>,
}

impl ScriptedBus {
    pub fn answer(mut self, event: &str, response: EventResponse) -> Self {
        self.script.insert(event.to_string(), response);
        self
    }

    pub fn failing_on(mut self, event: &str) -> Self {
        self.fail_on = Some(event.to_string());
        self
    }

    pub fn calls(&self) -> Vec<(String, i64, i64)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventBus for ScriptedBus {
    async fn invoke(&self, name: &str, payload: &EventPayload) -> Result<EventResponse, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), payload.id, payload.action));
        if self.fail_on.as_deref() == Some(name) {
            return Err(AppError::Event(format!("{name} handler crashed")));
        }
        Ok(self.script.get(name).cloned().unwrap_or(EventResponse::None))
    }
}

// ============================================================================
// BUILDERS
// ============================================================================

pub fn tv(id: i64, name: &str, category: i64) -> TmplVar {
    TmplVar {
        id,
        name: name.to_string(),
        category,
        ..Default::default()
    }
}

pub fn stored_template(id: i64, name: &str) -> Template {
    Template {
        id,
        templatename: name.to_string(),
        selectable: true,
        ..Default::default()
    }
}

pub fn services(store: Arc<MemoryStore>, bus: Arc<ScriptedBus>) -> TemplateServices {
    TemplateServices {
        store: store.clone(),
        catalog: store.clone(),
        locks: store,
        lexicon: Arc::new(StaticLexicon::english()),
        events: bus,
        privileged_role: ADMIN_ROLE,
    }
}

pub fn permissions(codes: &[&str]) -> Permissions {
    Permissions(codes.iter().map(|c| c.to_string()).collect())
}

/// Context for an editor opening template `id`.
pub fn edit_ctx(id: i64) -> RequestContext {
    RequestContext {
        action: 16,
        element_id: id,
        user_id: ME,
        role: EDITOR_ROLE,
        permissions: permissions(&["edit_template"]),
        ..Default::default()
    }
}

/// Context for an editor creating a template, optionally preselecting a category.
pub fn new_ctx(catid: Option<i64>) -> RequestContext {
    RequestContext {
        action: 19,
        element_id: 0,
        catid,
        user_id: ME,
        role: EDITOR_ROLE,
        permissions: permissions(&["new_template"]),
        ..Default::default()
    }
}
