//! Storage capabilities used by the element controllers.
//!
//! Controllers only see these traits; [`PgStore`] backs them with Postgres
//! and tests substitute in-memory fakes.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::category::{self, Category, CategoryWithTvs};
use crate::models::{active_user, template};
use crate::models::template::Template;
use crate::models::tmplvar::{self, TmplVar};

#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Template by id with its bound TVs eager-loaded.
    async fn find_with_tvs(&self, id: i64) -> Result<Option<Template>, AppError>;
}

/// Read-only listings feeding the category and TV widgets.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Ordered by rank, then name.
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    /// TVs without a category, ordered by name, minus `exclude`.
    async fn list_ungrouped_tvs(&self, exclude: &[i64]) -> Result<Vec<TmplVar>, AppError>;

    /// Categories with at least one TV outside `exclude`, ordered by rank.
    async fn list_categories_with_tvs(
        &self,
        exclude: &[i64],
    ) -> Result<Vec<CategoryWithTvs>, AppError>;
}

/// Registry of who is currently editing what. Read only from here.
#[async_trait]
pub trait LockRegistry: Send + Sync {
    async fn locked_by(
        &self,
        scope: i64,
        element_id: i64,
        except_user: i64,
    ) -> Result<Option<String>, AppError>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgStore {
    async fn find_with_tvs(&self, id: i64) -> Result<Option<Template>, AppError> {
        template::find_with_tvs(&self.pool, id).await
    }
}

#[async_trait]
impl Catalog for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        category::find_all(&self.pool).await
    }

    async fn list_ungrouped_tvs(&self, exclude: &[i64]) -> Result<Vec<TmplVar>, AppError> {
        tmplvar::find_ungrouped(&self.pool, exclude).await
    }

    async fn list_categories_with_tvs(
        &self,
        exclude: &[i64],
    ) -> Result<Vec<CategoryWithTvs>, AppError> {
        category::find_with_tvs(&self.pool, exclude).await
    }
}

#[async_trait]
impl LockRegistry for PgStore {
    async fn locked_by(
        &self,
        scope: i64,
        element_id: i64,
        except_user: i64,
    ) -> Result<Option<String>, AppError> {
        active_user::locked_by(&self.pool, scope, element_id, except_user).await
    }
}
