// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- 1. Movimientos (livro-razão, append-only) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Ingreso,
    Salida,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_concept", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementConcept {
    Compra,
    Ajuste,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMovement {
    pub id: i64,
    pub branch_id: i64,
    pub user_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub concept: MovementConcept,
    pub request_id: Option<i64>,
    pub invoice_id: Option<i64>,
    pub product_id: i64,
    pub quantity: Decimal,
    pub unit_measure: String,
    pub document_number: Option<String>,
    pub document_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- 2. Saldo por (sucursal, produto) ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    pub id: i64,
    pub branch_id: i64,
    pub product_id: i64,
    pub stock_current: Decimal,
    pub min_stock: Decimal,
    pub reorder_point: Decimal,
    pub last_update: DateTime<Utc>,
}

/// Situação derivada do saldo. Nunca é persistida: recalculada a cada leitura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum StockStatus {
    #[serde(rename = "CRITICO")]
    Critico,
    #[serde(rename = "ALERTA")]
    Alerta,
    #[serde(rename = "OK")]
    Ok,
}

/// CRITICO se saldo <= mínimo; ALERTA se <= ponto de reposição; senão OK.
pub fn stock_status(current: Decimal, min_stock: Decimal, reorder_point: Decimal) -> StockStatus {
    if current <= min_stock {
        StockStatus::Critico
    } else if current <= reorder_point {
        StockStatus::Alerta
    } else {
        StockStatus::Ok
    }
}

/// Falha pura de débito de estoque. `disponible = None` significa que nem
/// existe linha de saldo para descontar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockInsuficiente {
    pub disponible: Option<Decimal>,
}

/// Calcula o novo saldo de uma movimentação.
/// SALIDA jamais pode deixar o saldo negativo: a verificação acontece
/// ANTES do débito, e o chamador aborta a transação inteira em caso de erro.
pub fn next_stock_balance(
    current: Option<Decimal>,
    movement: MovementType,
    quantity: Decimal,
) -> Result<Decimal, StockInsuficiente> {
    match movement {
        MovementType::Ingreso => Ok(current.unwrap_or(Decimal::ZERO) + quantity),
        MovementType::Salida => {
            let Some(actual) = current else {
                return Err(StockInsuficiente { disponible: None });
            };
            if actual < quantity {
                return Err(StockInsuficiente {
                    disponible: Some(actual),
                });
            }
            Ok(actual - quantity)
        }
    }
}

// --- 3. Vistas de leitura ---

/// Linha crua do join estoque x produto x sucursal.
#[derive(Debug, Clone, FromRow)]
pub struct StockRow {
    pub branch_id: i64,
    pub branch_name: String,
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub unit_measure: String,
    pub stock_current: Decimal,
    pub min_stock: Decimal,
    pub reorder_point: Decimal,
    pub last_update: DateTime<Utc>,
}

/// A mesma linha com o status projetado, pronta para o frontend.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    pub branch_id: i64,
    pub branch_name: String,
    pub product_id: i64,
    pub product_code: String,
    pub product_name: String,
    pub unit_measure: String,
    pub stock_current: Decimal,
    pub min_stock: Decimal,
    pub reorder_point: Decimal,
    pub last_update: DateTime<Utc>,
    pub status: StockStatus,
}

impl From<StockRow> for StockView {
    fn from(row: StockRow) -> Self {
        let status = stock_status(row.stock_current, row.min_stock, row.reorder_point);
        StockView {
            branch_id: row.branch_id,
            branch_name: row.branch_name,
            product_id: row.product_id,
            product_code: row.product_code,
            product_name: row.product_name,
            unit_measure: row.unit_measure,
            stock_current: row.stock_current,
            min_stock: row.min_stock,
            reorder_point: row.reorder_point,
            last_update: row.last_update,
            status,
        }
    }
}

/// Histórico de movimentações de um produto, com metadados da compra.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementHistoryRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub quantity: Decimal,
    pub unit_measure: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub concept: MovementConcept,
    pub guide_number: Option<String>,
    pub guide_path: Option<String>,
    pub user_name: String,
    pub request_id: Option<i64>,
    pub invoice_number: Option<String>,
    pub provider_name: Option<String>,
    pub provider_ruc: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementHistoryPage {
    pub data: Vec<MovementHistoryRow>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

/// Recepções agrupadas por guia, para a tela da solicitud.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionSummary {
    pub id: i64,
    pub document_number: Option<String>,
    pub document_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub items_count: i64,
}

// --- 4. Entradas ---

/// Linha do items_json da recepção: produto por id ou por nome.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionItemInput {
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub quantity: Decimal,
    pub unit_measure: Option<String>,
}

/// Ajuste manual de estoque. Sem branch_id, vale a sucursal do usuário.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentPayload {
    pub branch_id: Option<i64>,
    pub product_id: i64,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub reason: Option<String>,
}
