// src/handlers/purchases.rs

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{error::AppError, response::ActionResult, storage::UploadedFile},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermComprasAprobar, PermComprasValidar, PermDocsRevisar, RequirePermission},
    },
    models::purchases::{
        DocumentKind, DocumentStatus, InvoiceGroupInput, InvoiceRef, InvoiceWithVouchers,
        RequestDetails, RequestSummary,
    },
    services::purchase_service::RequestForm,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovePayload {
    pub comment: Option<String>,
    pub selected_quotation_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectPayload {
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub status: DocumentStatus,
    pub observation: Option<String>,
}

// --- Leituras ---

#[utoipa::path(
    get,
    path = "/api/compras/solicitudes",
    tag = "Compras",
    responses(
        (status = 200, description = "Todas as solicitudes, mais recentes primeiro", body = [RequestSummary])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<RequestSummary>>, AppError> {
    Ok(Json(app_state.purchase_service.list_requests().await?))
}

#[utoipa::path(
    get,
    path = "/api/compras/solicitudes/{id}",
    tag = "Compras",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Solicitud com as cotações", body = RequestDetails),
        (status = 404, description = "Solicitud não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RequestDetails>, AppError> {
    Ok(Json(app_state.purchase_service.request_details(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/compras/solicitudes/{id}/ejecucion",
    tag = "Compras",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Faturas da solicitud com seus vouchers", body = [InvoiceWithVouchers])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_execution(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<InvoiceWithVouchers>>, AppError> {
    Ok(Json(app_state.purchase_service.execution_view(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/compras/solicitudes/{id}/facturas",
    tag = "Compras",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Faturas para o combo da recepção", body = [InvoiceRef])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoice_refs(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<InvoiceRef>>, AppError> {
    Ok(Json(
        app_state.purchase_service.invoice_refs(id).await?,
    ))
}

// --- Criação e edição (multipart: campos + cotações em PDF) ---

#[utoipa::path(
    post,
    path = "/api/compras/solicitudes",
    tag = "Compras",
    responses(
        (status = 201, description = "Solicitud registrada em PENDIENTE", body = ActionResult)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = parse_request_form(multipart).await?;
    let result = app_state.purchase_service.create_request(&user, form).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    put,
    path = "/api/compras/solicitudes/{id}",
    tag = "Compras",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Solicitud atualizada", body = ActionResult),
        (status = 409, description = "Estado não permite edição")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ActionResult>, AppError> {
    let form = parse_request_form(multipart).await?;
    Ok(Json(
        app_state.purchase_service.update_request(id, &user, form).await?,
    ))
}

// --- Decisão ---

#[utoipa::path(
    post,
    path = "/api/compras/solicitudes/{id}/aprobar",
    tag = "Compras",
    request_body = ApprovePayload,
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Solicitud aprovada", body = ActionResult),
        (status = 409, description = "Estado não permite aprovação")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermComprasAprobar>,
    Path(id): Path<i64>,
    Json(payload): Json<ApprovePayload>,
) -> Result<Json<ActionResult>, AppError> {
    Ok(Json(
        app_state
            .purchase_service
            .approve(
                id,
                &user,
                payload.comment.as_deref(),
                payload.selected_quotation_id,
            )
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/compras/solicitudes/{id}/rechazar",
    tag = "Compras",
    request_body = RejectPayload,
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Solicitud rechazada", body = ActionResult),
        (status = 409, description = "Motivo insuficiente ou estado inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermComprasAprobar>,
    Path(id): Path<i64>,
    Json(payload): Json<RejectPayload>,
) -> Result<Json<ActionResult>, AppError> {
    Ok(Json(
        app_state
            .purchase_service
            .reject(id, &user, &payload.reason)
            .await?,
    ))
}

// --- Execução da compra (multipart: "data" JSON + arquivos nomeados) ---

// Os arquivos chegam como `file_invoice_{tempId}` e
// `file_voucher_{tempId}_{voucherTempId}`, casando com o JSON do campo "data".
#[utoipa::path(
    post,
    path = "/api/compras/solicitudes/{id}/ejecucion",
    tag = "Compras",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Faturas e vouchers registrados", body = ActionResult),
        (status = 409, description = "Voucher em conflito ou estado inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_execution(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ActionResult>, AppError> {
    let mut groups: Option<Vec<InvoiceGroupInput>> = None;
    let mut files: HashMap<String, UploadedFile> = HashMap::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "data" {
            let raw = field.text().await?;
            groups = Some(serde_json::from_str(&raw).map_err(|_| {
                AppError::BusinessRule("El campo 'data' es inválido.".to_string())
            })?);
        } else if name.starts_with("file_") {
            let file_name = field.file_name().unwrap_or("archivo").to_string();
            let data = field.bytes().await?.to_vec();
            files.insert(name, UploadedFile { file_name, data });
        }
    }

    let groups = groups.ok_or(AppError::MissingField("data"))?;
    Ok(Json(
        app_state
            .purchase_service
            .register_execution(id, &user, groups, files)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/compras/solicitudes/{id}/completar",
    tag = "Compras",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Solicitud marcada como COMPLETADO", body = ActionResult),
        (status = 409, description = "Estado não permite completar")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i64>,
) -> Result<Json<ActionResult>, AppError> {
    Ok(Json(app_state.purchase_service.complete(id, &user).await?))
}

// --- Revisão contábil e fechamento ---

#[utoipa::path(
    post,
    path = "/api/compras/documentos/{kind}/{id}/revisar",
    tag = "Compras",
    request_body = ReviewPayload,
    params(
        ("kind" = DocumentKind, Path, description = "factura ou voucher"),
        ("id" = i64, Path, description = "ID do documento")
    ),
    responses(
        (status = 200, description = "Documento revisado", body = ActionResult),
        (status = 409, description = "Documento já revisado ou observação faltando")
    ),
    security(("api_jwt" = []))
)]
pub async fn review_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermDocsRevisar>,
    Path((kind, id)): Path<(DocumentKind, i64)>,
    Json(payload): Json<ReviewPayload>,
) -> Result<Json<ActionResult>, AppError> {
    Ok(Json(
        app_state
            .purchase_service
            .review_document(kind, id, payload.status, payload.observation.as_deref(), &user)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/compras/solicitudes/{id}/validar",
    tag = "Compras",
    params(
        ("id" = i64, Path, description = "ID da solicitud")
    ),
    responses(
        (status = 200, description = "Solicitud fechada em VALIDADA", body = ActionResult),
        (status = 409, description = "Documentos pendentes ou estado inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_request(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermComprasValidar>,
    Path(id): Path<i64>,
) -> Result<Json<ActionResult>, AppError> {
    Ok(Json(app_state.purchase_service.close(id, &user).await?))
}

// --- Parsing do formulário multipart da solicitud ---

async fn parse_request_form(mut multipart: Multipart) -> Result<RequestForm, AppError> {
    let mut branch_id = None;
    let mut issue_date = None;
    let mut description = String::new();
    let mut estimated_total = None;
    let mut currency = "PEN".to_string();
    let mut quotations = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "branchId" => branch_id = Some(parse_field::<i64>(&field.text().await?, "branchId")?),
            "issueDate" => {
                issue_date = Some(parse_field::<NaiveDate>(&field.text().await?, "issueDate")?)
            }
            "description" => description = field.text().await?,
            "estimatedTotal" => {
                estimated_total =
                    Some(parse_field::<Decimal>(&field.text().await?, "estimatedTotal")?)
            }
            "currency" => currency = field.text().await?.trim().to_uppercase(),
            "quotations" => {
                let file_name = field.file_name().unwrap_or("cotizacion").to_string();
                let data = field.bytes().await?.to_vec();
                quotations.push(UploadedFile { file_name, data });
            }
            _ => {}
        }
    }

    Ok(RequestForm {
        branch_id,
        issue_date,
        description,
        estimated_total: estimated_total.ok_or(AppError::MissingField("estimatedTotal"))?,
        currency,
        quotations,
    })
}

fn parse_field<T: FromStr>(raw: &str, field: &'static str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::BusinessRule(format!("El campo '{field}' es inválido.")))
}
