// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{error::AppError, response::ActionResult, storage::UploadedFile},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermAjuste, PermRecepcion, RequirePermission},
    },
    models::inventory::{
        AdjustmentPayload, MovementHistoryPage, ReceptionItemInput, ReceptionSummary, StockView,
    },
    services::inventory_service::{HistoryParams, ReceptionForm},
};

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StockQuery {
    /// Filtro por sucursal (perfis de loja são travados na própria)
    pub branch_id: Option<i64>,
    /// Trecho do nome ou código do produto
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub product_id: i64,
    pub branch_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

// --- Estoque ---

#[utoipa::path(
    get,
    path = "/api/inventario/stock",
    tag = "Inventario",
    params(StockQuery),
    responses(
        (status = 200, description = "Saldos com status CRITICO/ALERTA/OK", body = [StockView])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stock(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<StockView>>, AppError> {
    Ok(Json(
        app_state
            .inventory_service
            .stock_list(&user, query.branch_id, query.q.as_deref())
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/inventario/historial",
    tag = "Inventario",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Histórico paginado do produto", body = MovementHistoryPage)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_history(
    State(app_state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<MovementHistoryPage>, AppError> {
    Ok(Json(
        app_state
            .inventory_service
            .product_history(HistoryParams {
                product_id: query.product_id,
                branch_id: query.branch_id,
                start_date: query.start_date,
                end_date: query.end_date,
                page: query.page,
                limit: query.limit,
            })
            .await?,
    ))
}

// --- Ajuste manual ---

#[utoipa::path(
    post,
    path = "/api/inventario/ajuste",
    tag = "Inventario",
    request_body = AdjustmentPayload,
    responses(
        (status = 200, description = "Movimento de ajuste registrado", body = ActionResult),
        (status = 409, description = "Stock insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn manual_adjustment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermAjuste>,
    Json(payload): Json<AdjustmentPayload>,
) -> Result<Json<ActionResult>, AppError> {
    Ok(Json(
        app_state
            .inventory_service
            .manual_adjustment(&user, payload)
            .await?,
    ))
}

// --- Recepção física (multipart: campos + guia de remisión) ---

#[utoipa::path(
    post,
    path = "/api/compras/solicitudes/{id}/recepcion",
    tag = "Inventario",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 201, description = "Ingressos registrados no livro-razão", body = ActionResult),
        (status = 409, description = "Estado não permite recepção")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_reception(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermRecepcion>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut invoice_id = None;
    let mut guide_number = None;
    let mut guide_file = None;
    let mut items: Option<Vec<ReceptionItemInput>> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "invoiceId" => {
                let raw = field.text().await?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    invoice_id = Some(raw.parse::<i64>().map_err(|_| {
                        AppError::BusinessRule("El campo 'invoiceId' es inválido.".to_string())
                    })?);
                }
            }
            "guideNumber" => guide_number = Some(field.text().await?),
            "items" => {
                let raw = field.text().await?;
                items = Some(serde_json::from_str(&raw).map_err(|_| {
                    AppError::BusinessRule("El campo 'items' es inválido.".to_string())
                })?);
            }
            "guideFile" => {
                let file_name = field.file_name().unwrap_or("guia").to_string();
                let data = field.bytes().await?.to_vec();
                guide_file = Some(UploadedFile { file_name, data });
            }
            _ => {}
        }
    }

    let items = items.ok_or(AppError::MissingField("items"))?;
    let result = app_state
        .inventory_service
        .register_reception(id, &user, ReceptionForm { invoice_id, guide_number, guide_file, items })
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/compras/solicitudes/{id}/recepciones",
    tag = "Inventario",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Recepções agrupadas por guia", body = [ReceptionSummary])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_receptions(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ReceptionSummary>>, AppError> {
    Ok(Json(app_state.inventory_service.receptions(id).await?))
}
