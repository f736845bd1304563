// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::products::{Product, ProductSearchRow},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Reserva o id na sequência antes do insert, para que o código
    // sequencial (PROD-000001, ...) saia sempre do mesmo valor da chave,
    // mesmo sob concorrência.
    pub async fn next_id(&self) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT nextval(pg_get_serial_sequence('products', 'id'))",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn insert(
        &self,
        id: i64,
        code: &str,
        name: &str,
        description: Option<&str>,
        unit_measure: &str,
        created_by: i64,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, code, name, description, unit_measure, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, code, name, description, unit_measure, active, created_at
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(unit_measure)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, description, unit_measure, active, created_at
            FROM products
            WHERE active = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    // Autocomplete da tela de recepção
    pub async fn search(&self, term: &str) -> Result<Vec<ProductSearchRow>, AppError> {
        let pattern = format!("%{}%", term.trim());
        let rows = sqlx::query_as::<_, ProductSearchRow>(
            r#"
            SELECT id, name, code, unit_measure
            FROM products
            WHERE active = TRUE AND (name ILIKE $1 OR code ILIKE $1)
            ORDER BY name
            LIMIT 20
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i64) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, description, unit_measure, active, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    // Comparação exata, ignorando caixa. Evita duplicar produto quando a
    // recepção digita o nome em vez de escolher no autocomplete.
    pub async fn find_active_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, description, unit_measure, active, created_at
            FROM products
            WHERE active = TRUE AND upper(name) = upper($1)
            "#,
        )
        .bind(name.trim())
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }
}
