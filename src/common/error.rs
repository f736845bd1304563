// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central. Toda operação de negócio devolve
// Result<_, AppError> e o IntoResponse abaixo converte em {success, message}.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Permissão insuficiente: {0}")]
    Forbidden(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    // Campo obrigatório ausente no formulário multipart
    #[error("Campo obrigatório: {0}")]
    MissingField(&'static str),

    // Documento novo sem arquivo anexado (fatura/voucher)
    #[error("Arquivo obrigatório: {0}")]
    MissingFile(String),

    // Violação de regra de negócio (estado errado, documentos pendentes...)
    #[error("Regra de negócio: {0}")]
    BusinessRule(String),

    #[error("Voucher já utilizado: {0}")]
    VoucherEnUso(String),

    #[error("Stock insuficiente (atual: {0})")]
    StockInsuficiente(Decimal),

    // Chave natural duplicada (nº de documento do cliente, etc)
    #[error("Registro duplicado: {0}")]
    Conflict(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de E/S")]
    IoError(#[from] std::io::Error),

    #[error("Erro no upload multipart")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Devolve todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "success": false,
                    "message": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Credenciales inválidas. Revisa tu correo o contraseña.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Sesión expirada o token inválido.".to_string(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuario no encontrado.".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                format!("Falta el campo obligatorio '{}'.", field),
            ),
            AppError::MissingFile(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BusinessRule(msg) => (StatusCode::CONFLICT, msg),
            AppError::VoucherEnUso(msg) => (StatusCode::CONFLICT, msg),
            AppError::StockInsuficiente(actual) => (
                StatusCode::CONFLICT,
                format!("Stock insuficiente (Actual: {}).", actual),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::MultipartError(e) => (
                StatusCode::BAD_REQUEST,
                format!("Formulario inválido: {}", e),
            ),

            // Infraestrutura (banco, disco, hash, ...) vira 500 genérico.
            // O tracing guarda a mensagem detalhada que o thiserror nos dá.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado. Intenta de nuevo.".to_string(),
                )
            }
        };

        let body = Json(json!({ "success": false, "message": message }));
        (status, body).into_response()
    }
}
