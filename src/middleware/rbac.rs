// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::Role, models::auth::User};

/// 1. O Trait que define o que é uma Permissão
///
/// Os papéis são fixos no sistema, então a tabela de capacidades vive no
/// código em vez do banco. Cada permissão nomeia a ação e os papéis que
/// podem executá-la.
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
    fn roles() -> &'static [Role];
}

/// 2. O Extractor (Guardião)
///
/// Basta declarar `RequirePermission<PermX>` como argumento do handler:
/// a checagem roda antes do corpo e devolve 403 com o slug da permissão.
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().ok_or(AppError::InvalidToken)?;

        if !T::roles().contains(&user.role) {
            return Err(AppError::Forbidden(format!(
                "No tiene permiso para esta acción ({}).",
                T::slug()
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermComprasAprobar;
impl PermissionDef for PermComprasAprobar {
    fn slug() -> &'static str {
        "compras:aprobar"
    }
    fn roles() -> &'static [Role] {
        &[Role::Ceo, Role::AdministradorGeneral, Role::Logistica]
    }
}

pub struct PermComprasValidar;
impl PermissionDef for PermComprasValidar {
    fn slug() -> &'static str {
        "compras:validar"
    }
    fn roles() -> &'static [Role] {
        &[Role::Ceo, Role::AdministradorGeneral, Role::Logistica, Role::Contador]
    }
}

pub struct PermDocsRevisar;
impl PermissionDef for PermDocsRevisar {
    fn slug() -> &'static str {
        "documentos:revisar"
    }
    fn roles() -> &'static [Role] {
        &[Role::Ceo, Role::AdministradorGeneral, Role::Logistica, Role::Contador]
    }
}

pub struct PermRecepcion;
impl PermissionDef for PermRecepcion {
    fn slug() -> &'static str {
        "inventario:recepcion"
    }
    fn roles() -> &'static [Role] {
        &[
            Role::Ceo,
            Role::AdministradorGeneral,
            Role::Logistica,
            Role::AdminSuc,
            Role::Almacen,
        ]
    }
}

pub struct PermAjuste;
impl PermissionDef for PermAjuste {
    fn slug() -> &'static str {
        "inventario:ajuste"
    }
    fn roles() -> &'static [Role] {
        &[
            Role::Ceo,
            Role::AdministradorGeneral,
            Role::Logistica,
            Role::AdminSuc,
            Role::Almacen,
        ]
    }
}

pub struct PermProductosCrear;
impl PermissionDef for PermProductosCrear {
    fn slug() -> &'static str {
        "productos:crear"
    }
    fn roles() -> &'static [Role] {
        &[Role::Ceo, Role::AdministradorGeneral, Role::Logistica]
    }
}

pub struct PermClientesGestionar;
impl PermissionDef for PermClientesGestionar {
    fn slug() -> &'static str {
        "clientes:gestionar"
    }
    fn roles() -> &'static [Role] {
        &[Role::Ceo, Role::AdministradorGeneral, Role::Ventas]
    }
}
