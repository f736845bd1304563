// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Papel do usuário no sistema. Antes eram strings soltas comparadas contra
/// arrays hardcoded; aqui viram um enum tipado (a tabela de capacidades por
/// ação vive em middleware/rbac.rs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum Role {
    #[sqlx(rename = "CEO")]
    #[serde(rename = "CEO")]
    Ceo,
    #[sqlx(rename = "ADMINISTRADOR GENERAL")]
    #[serde(rename = "ADMINISTRADOR GENERAL")]
    AdministradorGeneral,
    #[sqlx(rename = "LOGISTICA")]
    #[serde(rename = "LOGISTICA")]
    Logistica,
    #[sqlx(rename = "CONTADOR")]
    #[serde(rename = "CONTADOR")]
    Contador,
    #[sqlx(rename = "ADMIN_SUC")]
    #[serde(rename = "ADMIN_SUC")]
    AdminSuc,
    #[sqlx(rename = "ALMACEN")]
    #[serde(rename = "ALMACEN")]
    Almacen,
    #[sqlx(rename = "VENTAS")]
    #[serde(rename = "VENTAS")]
    Ventas,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ceo => "CEO",
            Role::AdministradorGeneral => "ADMINISTRADOR GENERAL",
            Role::Logistica => "LOGISTICA",
            Role::Contador => "CONTADOR",
            Role::AdminSuc => "ADMIN_SUC",
            Role::Almacen => "ALMACEN",
            Role::Ventas => "VENTAS",
        }
    }

    /// Papéis corporativos escolhem a sucursal nos ajustes manuais;
    /// os papéis de loja operam sempre sobre a sucursal da própria sessão.
    pub fn puede_elegir_sucursal(&self) -> bool {
        matches!(
            self,
            Role::Ceo | Role::AdministradorGeneral | Role::Logistica
        )
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub full_name: String,
    pub role: Role,
    pub branch_id: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "El correo es inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // Subject (ID do usuário)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}
