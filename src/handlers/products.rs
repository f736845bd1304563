// src/handlers/products.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{error::AppError, response::ActionResult},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermProductosCrear, RequirePermission},
    },
    models::products::{CreateProductPayload, Product, ProductSearchRow},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Trecho do nome ou do código
    pub q: String,
}

#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Productos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado com código sequencial", body = ActionResult),
        (status = 409, description = "Produto já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermProductosCrear>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state.product_service.create(payload, user.id).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Productos",
    responses(
        (status = 200, description = "Produtos ativos", body = [Product])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.product_service.list().await?))
}

// Autocomplete da recepção
#[utoipa::path(
    get,
    path = "/api/productos/buscar",
    tag = "Productos",
    params(SearchQuery),
    responses(
        (status = 200, description = "Até 20 produtos que casam com o termo", body = [ProductSearchRow])
    ),
    security(("api_jwt" = []))
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductSearchRow>>, AppError> {
    Ok(Json(app_state.product_service.search(&query.q).await?))
}
