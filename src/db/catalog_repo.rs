// src/db/catalog_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::catalog::{Branch, CatalogEntry},
};

/// Leituras de apoio: sucursais e entradas de master_catalogs.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_branches(&self) -> Result<Vec<Branch>, AppError> {
        let branches = sqlx::query_as::<_, Branch>(
            r#"
            SELECT id, name
            FROM branches
            WHERE active = TRUE AND deleted_at IS NULL
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(branches)
    }

    pub async fn find_branch(&self, id: i64) -> Result<Option<Branch>, AppError> {
        let branch = sqlx::query_as::<_, Branch>(
            "SELECT id, name FROM branches WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(branch)
    }

    // Uma categoria por vez: CLIENT_TYPE, DOC_TYPE, COUNTRY, UNIT_MEASURE
    pub async fn list_catalog(&self, category: &str) -> Result<Vec<CatalogEntry>, AppError> {
        let entries = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT id, code, description, num_1
            FROM master_catalogs
            WHERE category = $1 AND active = TRUE
            ORDER BY description
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
