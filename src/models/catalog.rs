// src/models/catalog.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: i64,
    pub name: String,
}

/// Uma entrada genérica de master_catalogs (tipos de cliente, tipos de
/// documento, países, unidades de medida).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: i64,
    pub code: String,
    pub description: String,
    pub num_1: Option<String>,
}

// As moedas são fixas no sistema original, não vêm do banco.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
}

pub const CURRENCIES: [Currency; 2] = [
    Currency {
        code: "PEN",
        name: "Soles",
    },
    Currency {
        code: "USD",
        name: "Dólares",
    },
];
