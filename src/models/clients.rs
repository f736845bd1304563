// src/models/clients.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Pessoa natural ou empresa jurídica — o registro é unificado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "client_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientKind {
    Natural,
    Juridica,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub kind: ClientKind,
    pub doc_type: String,
    pub doc_number: String,
    pub first_name: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub business_name: Option<String>,
    pub trade_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub department: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub zip_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    pub kind: ClientKind,

    #[validate(length(min = 2, message = "El tipo de documento es obligatorio."))]
    pub doc_type: String,

    #[validate(length(min = 8, max = 12, message = "El número de documento es inválido."))]
    pub doc_number: String,

    // Pessoa natural
    pub first_name: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,

    // Empresa jurídica
    pub business_name: Option<String>,
    pub trade_name: Option<String>,

    #[validate(email(message = "El correo es inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub department: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub zip_code: Option<String>,
}

impl CreateClientPayload {
    /// O nome exigido depende do tipo de cliente.
    pub fn nombre_valido(&self) -> bool {
        match self.kind {
            ClientKind::Natural => {
                self.first_name.as_deref().is_some_and(|s| !s.trim().is_empty())
                    && self
                        .paternal_surname
                        .as_deref()
                        .is_some_and(|s| !s.trim().is_empty())
            }
            ClientKind::Juridica => self
                .business_name
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty()),
        }
    }
}

/// O update não permite trocar tipo nem documento.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    pub first_name: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub business_name: Option<String>,
    pub trade_name: Option<String>,

    #[validate(email(message = "El correo es inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub department: Option<String>,
    pub province: Option<String>,
    pub district: Option<String>,
    pub zip_code: Option<String>,
}
