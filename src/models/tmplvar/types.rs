use serde::Serialize;

/// A template variable: a typed field definition bindable to templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TmplVar {
    pub id: i64,
    pub name: String,
    pub caption: String,
    pub description: String,
    pub category: i64, // 0 = ungrouped
    pub rank: i64,
    /// Ids of templates using this TV. Only filled by catalog reads.
    #[sqlx(skip)]
    pub templates: Vec<i64>,
}

impl TmplVar {
    pub fn is_grouped(&self) -> bool {
        self.category != 0
    }

    pub fn is_used_by(&self, template_id: i64) -> bool {
        self.templates.contains(&template_id)
    }
}

/// One row of the TV/template binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct TemplateRef {
    pub tmplvarid: i64,
    pub templateid: i64,
}
