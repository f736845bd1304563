// src/handlers/catalog.rs

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::catalog::{Branch, CURRENCIES, CatalogEntry, Currency},
};

#[utoipa::path(
    get,
    path = "/api/catalogos/sucursales",
    tag = "Catalogos",
    responses(
        (status = 200, description = "Sucursais ativas", body = [Branch])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_branches(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Branch>>, AppError> {
    Ok(Json(app_state.catalog_repo.list_branches().await?))
}

#[utoipa::path(
    get,
    path = "/api/catalogos/monedas",
    tag = "Catalogos",
    responses(
        (status = 200, description = "Moedas aceitas", body = [Currency])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_currencies() -> Json<Vec<Currency>> {
    Json(CURRENCIES.to_vec())
}

// Categorias: CLIENT_TYPE, DOC_TYPE, COUNTRY, UNIT_MEASURE
#[utoipa::path(
    get,
    path = "/api/catalogos/{category}",
    tag = "Catalogos",
    params(
        ("category" = String, Path, description = "Categoria do catálogo mestre")
    ),
    responses(
        (status = 200, description = "Entradas da categoria", body = [CatalogEntry])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_catalog(
    State(app_state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    Ok(Json(
        app_state
            .catalog_repo
            .list_catalog(&category.to_uppercase())
            .await?,
    ))
}
