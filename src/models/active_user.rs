use sqlx::PgPool;

use crate::errors::AppError;

/// Lock scope of the template edit form.
pub const LOCK_SCOPE_TEMPLATE: i64 = 16;

/// Username of another manager user holding an edit lock on the element.
/// The most recent lock wins when several are registered.
pub async fn locked_by(
    pool: &PgPool,
    element_type: i64,
    element_id: i64,
    except_user: i64,
) -> Result<Option<String>, AppError> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT u.username \
         FROM active_user_locks l \
         JOIN manager_users u ON u.id = l.internal_key \
         WHERE l.element_type = $1 \
           AND l.element_id = $2 \
           AND l.internal_key <> $3 \
         ORDER BY l.lasthit DESC \
         LIMIT 1",
    )
    .bind(element_type)
    .bind(element_id)
    .bind(except_user)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.0))
}
