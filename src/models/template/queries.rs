use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::tmplvar;
use super::types::*;

/// Find a template by id with its bound TVs. `exists` is set on the result.
pub async fn find_with_tvs(pool: &PgPool, id: i64) -> Result<Option<Template>, AppError> {
    let row = sqlx::query_as::<_, Template>(
        "SELECT id, templatename, templatealias, description, editor_type, category, \
                icon, template_type, content, locked, selectable \
         FROM site_templates WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(mut template) = row else {
        return Ok(None);
    };
    template.exists = true;
    template.tvs = tmplvar::find_by_template(pool, id).await?;
    Ok(Some(template))
}
