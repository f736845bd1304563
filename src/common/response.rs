// src/common/response.rs

use serde::Serialize;
use utoipa::ToSchema;

/// Resposta uniforme de toda mutação: o frontend original consome
/// exatamente este par {success, message}.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
