use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::form_value::{to_flag, to_int, to_text};
use crate::models::tmplvar::TmplVar;

/// A page-layout template, with its bound template variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, sqlx::FromRow)]
pub struct Template {
    pub id: i64,
    pub templatename: String,
    pub templatealias: String,
    pub description: String,
    pub editor_type: i64,
    pub category: i64, // 0 when not in a category
    pub icon: String,
    pub template_type: i64,
    pub content: String,
    pub locked: bool,
    pub selectable: bool,
    /// True when the record was loaded from storage.
    #[sqlx(skip)]
    pub exists: bool,
    /// Bound TVs in binding order.
    #[sqlx(skip)]
    pub tvs: Vec<TmplVar>,
}

impl Template {
    /// Unsaved template placed in `category`.
    pub fn new_in_category(category: i64) -> Self {
        Template {
            category,
            selectable: true,
            ..Default::default()
        }
    }

    /// Overwrite fields with posted values. Only fields present in `values`
    /// change; unknown keys are ignored. No validation happens here.
    pub fn fill(&mut self, values: &Map<String, Value>) {
        for (key, value) in values {
            match key.as_str() {
                "templatename" => self.templatename = to_text(value),
                "templatealias" => self.templatealias = to_text(value),
                "description" => self.description = to_text(value),
                "editor_type" => self.editor_type = to_int(value),
                "category" => self.category = to_int(value),
                "icon" => self.icon = to_text(value),
                "template_type" => self.template_type = to_int(value),
                "content" => self.content = to_text(value),
                "locked" => self.locked = to_flag(value),
                "selectable" => self.selectable = to_flag(value),
                _ => {}
            }
        }
    }
}
