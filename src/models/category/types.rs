use serde::Serialize;

use crate::models::tmplvar::TmplVar;

/// Grouping container for elements in the manager tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    /// Display name.
    pub category: String,
    pub rank: i64,
}

/// A category with its TVs, as used by the TV assignment widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryWithTvs {
    #[serde(flatten)]
    pub category: Category,
    pub tvs: Vec<TmplVar>,
}
