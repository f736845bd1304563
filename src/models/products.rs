// src/models/products.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_measure: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Linha enxuta para o autocomplete da recepção.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchRow {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub unit_measure: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,

    #[validate(length(min = 1, message = "La unidad de medida es obligatoria."))]
    pub unit_measure: String,

    pub description: Option<String>,
}

/// Código sequencial no padrão do sistema original (ex: PROD-000052).
pub fn product_code(id: i64) -> String {
    format!("PROD-{:06}", id)
}
