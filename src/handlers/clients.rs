// src/handlers/clients.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{error::AppError, response::ActionResult},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermClientesGestionar, RequirePermission},
    },
    models::clients::{Client, CreateClientPayload, UpdateClientPayload},
};

#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    responses(
        (status = 200, description = "Clientes ativos", body = [Client])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Client>>, AppError> {
    Ok(Json(app_state.client_service.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(
        ("id" = i64, Path, description = "ID do cliente")
    ),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Client>, AppError> {
    Ok(Json(app_state.client_service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CreateClientPayload,
    responses(
        (status = 201, description = "Cliente registrado", body = ActionResult),
        (status = 409, description = "Número de documento já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermClientesGestionar>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state.client_service.create(payload, user.id).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = UpdateClientPayload,
    params(
        ("id" = i64, Path, description = "ID do cliente")
    ),
    responses(
        (status = 200, description = "Cliente atualizado", body = ActionResult),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermClientesGestionar>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateClientPayload>,
) -> Result<Json<ActionResult>, AppError> {
    Ok(Json(app_state.client_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(
        ("id" = i64, Path, description = "ID do cliente")
    ),
    responses(
        (status = 200, description = "Cliente eliminado (soft delete)", body = ActionResult),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermClientesGestionar>,
    Path(id): Path<i64>,
) -> Result<Json<ActionResult>, AppError> {
    Ok(Json(app_state.client_service.delete(id).await?))
}
