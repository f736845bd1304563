// src/db/inventory_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::inventory::{
        MovementConcept, MovementHistoryRow, MovementType, ReceptionSummary, StockRow,
    },
};

/// Linha nova do livro-razão. O saldo é atualizado em separado, na mesma
/// transação.
pub struct NewMovement<'a> {
    pub branch_id: i64,
    pub user_id: i64,
    pub movement_type: MovementType,
    pub concept: MovementConcept,
    pub request_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub product_id: i64,
    pub quantity: Decimal,
    pub unit_measure: &'a str,
    pub document_number: Option<&'a str>,
    pub document_path: Option<&'a str>,
}

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        movement: &NewMovement<'_>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO inventory_movements (
                branch_id, user_id, type, concept,
                request_id, invoice_id, product_id,
                quantity, unit_measure, document_number, document_path
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(movement.branch_id)
        .bind(movement.user_id)
        .bind(movement.movement_type)
        .bind(movement.concept)
        .bind(movement.request_id)
        .bind(movement.invoice_id)
        .bind(movement.product_id)
        .bind(movement.quantity)
        .bind(movement.unit_measure)
        .bind(movement.document_number)
        .bind(movement.document_path)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    // Tranca a linha de saldo para a transação corrente. None = o par
    // (sucursal, produto) ainda não tem saldo registrado.
    pub async fn get_stock_for_update<'e, E>(
        &self,
        executor: E,
        branch_id: i64,
        product_id: i64,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let current = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT stock_current
            FROM product_stocks
            WHERE branch_id = $1 AND product_id = $2
            FOR UPDATE
            "#,
        )
        .bind(branch_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(current)
    }

    // Soma ao saldo, criando a linha se for a primeira entrada do produto
    // naquela sucursal.
    pub async fn upsert_stock_add<'e, E>(
        &self,
        executor: E,
        branch_id: i64,
        product_id: i64,
        quantity: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO product_stocks (branch_id, product_id, stock_current)
            VALUES ($1, $2, $3)
            ON CONFLICT (branch_id, product_id) DO UPDATE
            SET stock_current = product_stocks.stock_current + EXCLUDED.stock_current,
                last_update = NOW()
            "#,
        )
        .bind(branch_id)
        .bind(product_id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn set_stock_balance<'e, E>(
        &self,
        executor: E,
        branch_id: i64,
        product_id: i64,
        new_balance: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE product_stocks
            SET stock_current = $3, last_update = NOW()
            WHERE branch_id = $1 AND product_id = $2
            "#,
        )
        .bind(branch_id)
        .bind(product_id)
        .bind(new_balance)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn stock_list(
        &self,
        branch_id: Option<i64>,
        term: Option<&str>,
    ) -> Result<Vec<StockRow>, AppError> {
        let pattern = term.map(|t| format!("%{}%", t.trim()));
        let rows = sqlx::query_as::<_, StockRow>(
            r#"
            SELECT
                s.branch_id, b.name AS branch_name,
                s.product_id, p.code AS product_code, p.name AS product_name,
                p.unit_measure,
                s.stock_current, s.min_stock, s.reorder_point, s.last_update
            FROM product_stocks s
            JOIN branches b ON b.id = s.branch_id
            JOIN products p ON p.id = s.product_id
            WHERE ($1::bigint IS NULL OR s.branch_id = $1)
              AND ($2::text IS NULL OR p.name ILIKE $2 OR p.code ILIKE $2)
            ORDER BY b.name, p.name
            "#,
        )
        .bind(branch_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn product_history(
        &self,
        product_id: i64,
        branch_id: Option<i64>,
        start_date: Option<NaiveDate>,
        end_exclusive: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MovementHistoryRow>, AppError> {
        let rows = sqlx::query_as::<_, MovementHistoryRow>(
            r#"
            SELECT
                m.id, m.created_at, m.quantity, m.unit_measure,
                m.type, m.concept,
                m.document_number AS guide_number,
                m.document_path AS guide_path,
                u.full_name AS user_name,
                m.request_id,
                i.invoice_number,
                pr.name AS provider_name,
                pr.ruc AS provider_ruc
            FROM inventory_movements m
            JOIN users u ON u.id = m.user_id
            LEFT JOIN purchase_invoices i ON i.id = m.invoice_id
            LEFT JOIN providers pr ON pr.id = i.provider_id
            WHERE m.product_id = $1
              AND ($2::bigint IS NULL OR m.branch_id = $2)
              AND ($3::date IS NULL OR m.created_at >= $3::date)
              AND ($4::date IS NULL OR m.created_at < $4::date)
            ORDER BY m.created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .bind(start_date)
        .bind(end_exclusive)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn product_history_count(
        &self,
        product_id: i64,
        branch_id: Option<i64>,
        start_date: Option<NaiveDate>,
        end_exclusive: Option<NaiveDate>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM inventory_movements m
            WHERE m.product_id = $1
              AND ($2::bigint IS NULL OR m.branch_id = $2)
              AND ($3::date IS NULL OR m.created_at >= $3::date)
              AND ($4::date IS NULL OR m.created_at < $4::date)
            "#,
        )
        .bind(product_id)
        .bind(branch_id)
        .bind(start_date)
        .bind(end_exclusive)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // Uma linha por guia de remisión, com a quantidade de itens recebidos
    pub async fn receptions_by_request(
        &self,
        request_id: i64,
    ) -> Result<Vec<ReceptionSummary>, AppError> {
        let rows = sqlx::query_as::<_, ReceptionSummary>(
            r#"
            SELECT
                MIN(m.id) AS id,
                m.document_number, m.document_path,
                MIN(m.created_at) AS created_at,
                u.full_name AS user_name,
                COUNT(*) AS items_count
            FROM inventory_movements m
            JOIN users u ON u.id = m.user_id
            WHERE m.request_id = $1
              AND m.concept = 'COMPRA'
              AND m.type = 'INGRESO'
            GROUP BY m.document_number, m.document_path, u.full_name
            ORDER BY MIN(m.created_at) DESC
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
