// src/db/client_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::clients::{Client, CreateClientPayload, UpdateClientPayload},
};

const CLIENT_COLUMNS: &str = r#"
    id, kind, doc_type, doc_number,
    first_name, paternal_surname, maternal_surname,
    business_name, trade_name,
    email, phone, address,
    country, department, province, district, zip_code,
    created_at, updated_at
"#;

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Client>, AppError> {
        let sql = format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        let clients = sqlx::query_as::<_, Client>(&sql).fetch_all(&self.pool).await?;
        Ok(clients)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Client>, AppError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 AND deleted_at IS NULL");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    pub async fn insert(
        &self,
        payload: &CreateClientPayload,
        created_by: i64,
    ) -> Result<Client, AppError> {
        let sql = format!(
            r#"
            INSERT INTO clients (
                kind, doc_type, doc_number,
                first_name, paternal_surname, maternal_surname,
                business_name, trade_name,
                email, phone, address,
                country, department, province, district, zip_code,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {CLIENT_COLUMNS}
            "#
        );
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(payload.kind)
            .bind(&payload.doc_type)
            .bind(payload.doc_number.trim())
            .bind(&payload.first_name)
            .bind(&payload.paternal_surname)
            .bind(&payload.maternal_surname)
            .bind(&payload.business_name)
            .bind(&payload.trade_name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.address)
            .bind(&payload.country)
            .bind(&payload.department)
            .bind(&payload.province)
            .bind(&payload.district)
            .bind(&payload.zip_code)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(map_doc_number_conflict)?;
        Ok(client)
    }

    pub async fn update(
        &self,
        id: i64,
        payload: &UpdateClientPayload,
    ) -> Result<Option<Client>, AppError> {
        let sql = format!(
            r#"
            UPDATE clients SET
                first_name = $2, paternal_surname = $3, maternal_surname = $4,
                business_name = $5, trade_name = $6,
                email = $7, phone = $8, address = $9,
                country = $10, department = $11, province = $12,
                district = $13, zip_code = $14,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CLIENT_COLUMNS}
            "#
        );
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .bind(&payload.first_name)
            .bind(&payload.paternal_surname)
            .bind(&payload.maternal_surname)
            .bind(&payload.business_name)
            .bind(&payload.trade_name)
            .bind(&payload.email)
            .bind(&payload.phone)
            .bind(&payload.address)
            .bind(&payload.country)
            .bind(&payload.department)
            .bind(&payload.province)
            .bind(&payload.district)
            .bind(&payload.zip_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(client)
    }

    // Soft delete: o registro some das listagens mas preserva o histórico
    pub async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE clients SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn map_doc_number_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("clients_doc_number_key") {
            return AppError::Conflict("El número de documento ya existe.".to_string());
        }
    }
    e.into()
}
