use sqlx::PgPool;

use crate::errors::AppError;
use super::types::*;

const TV_COLUMNS: &str = "tv.id, tv.name, tv.caption, tv.description, tv.category, tv.rank";

/// TVs bound to a template, in binding order.
pub async fn find_by_template(pool: &PgPool, template_id: i64) -> Result<Vec<TmplVar>, AppError> {
    let sql = format!(
        "SELECT {TV_COLUMNS} \
         FROM site_tmplvars tv \
         JOIN site_tmplvar_templates tt ON tt.tmplvarid = tv.id \
         WHERE tt.templateid = $1 \
         ORDER BY tt.rank ASC, tv.name ASC"
    );
    let tvs = sqlx::query_as::<_, TmplVar>(&sql)
        .bind(template_id)
        .fetch_all(pool)
        .await?;
    Ok(tvs)
}

/// TVs outside any category, by name, skipping `exclude`. Template usage attached.
pub async fn find_ungrouped(pool: &PgPool, exclude: &[i64]) -> Result<Vec<TmplVar>, AppError> {
    let sql = format!(
        "SELECT {TV_COLUMNS} \
         FROM site_tmplvars tv \
         WHERE tv.category = 0 \
           AND NOT (tv.id = ANY($1)) \
         ORDER BY tv.name ASC"
    );
    let mut tvs = sqlx::query_as::<_, TmplVar>(&sql)
        .bind(exclude)
        .fetch_all(pool)
        .await?;
    load_template_refs(pool, &mut tvs).await?;
    Ok(tvs)
}

/// All TVs in the given categories, ordered by rank then name. Template usage attached.
pub async fn find_by_categories(
    pool: &PgPool,
    category_ids: &[i64],
) -> Result<Vec<TmplVar>, AppError> {
    if category_ids.is_empty() {
        return Ok(vec![]);
    }
    let sql = format!(
        "SELECT {TV_COLUMNS} \
         FROM site_tmplvars tv \
         WHERE tv.category = ANY($1) \
         ORDER BY tv.rank ASC, tv.name ASC"
    );
    let mut tvs = sqlx::query_as::<_, TmplVar>(&sql)
        .bind(category_ids)
        .fetch_all(pool)
        .await?;
    load_template_refs(pool, &mut tvs).await?;
    Ok(tvs)
}

async fn load_template_refs(pool: &PgPool, tvs: &mut [TmplVar]) -> Result<(), AppError> {
    if tvs.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = tvs.iter().map(|tv| tv.id).collect();
    let refs = sqlx::query_as::<_, TemplateRef>(
        "SELECT tmplvarid, templateid FROM site_tmplvar_templates \
         WHERE tmplvarid = ANY($1) \
         ORDER BY tmplvarid, templateid",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;
    attach_templates(tvs, &refs);
    Ok(())
}

/// Copy each binding row onto the matching TV's `templates` list.
pub fn attach_templates(tvs: &mut [TmplVar], refs: &[TemplateRef]) {
    for tv in tvs.iter_mut() {
        tv.templates = refs
            .iter()
            .filter(|r| r.tmplvarid == tv.id)
            .map(|r| r.templateid)
            .collect();
    }
}
