use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::tmplvar::{self, TmplVar};
use super::types::*;

/// All categories by rank, then name.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, category, rank FROM categories ORDER BY rank ASC, category ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Categories holding at least one TV outside `exclude`, by rank, each with
/// all of its TVs (and their template usage).
pub async fn find_with_tvs(
    pool: &PgPool,
    exclude: &[i64],
) -> Result<Vec<CategoryWithTvs>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT c.id, c.category, c.rank \
         FROM categories c \
         WHERE EXISTS ( \
             SELECT 1 FROM site_tmplvars tv \
             WHERE tv.category = c.id AND NOT (tv.id = ANY($1))) \
         ORDER BY c.rank ASC, c.id ASC",
    )
    .bind(exclude)
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
    let tvs = tmplvar::find_by_categories(pool, &ids).await?;
    Ok(group_by_category(categories, tvs))
}

/// Nest TVs under their categories, keeping the order of both inputs.
/// TVs whose category is not in `categories` are dropped.
pub fn group_by_category(categories: Vec<Category>, tvs: Vec<TmplVar>) -> Vec<CategoryWithTvs> {
    let mut grouped: Vec<CategoryWithTvs> = categories
        .into_iter()
        .map(|category| CategoryWithTvs {
            category,
            tvs: vec![],
        })
        .collect();
    for tv in tvs {
        if let Some(slot) = grouped.iter_mut().find(|g| g.category.id == tv.category) {
            slot.tvs.push(tv);
        }
    }
    grouped
}
