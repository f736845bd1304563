// src/services/client_service.rs

use validator::Validate;

use crate::{
    common::{error::AppError, response::ActionResult},
    db::ClientRepository,
    models::clients::{Client, CreateClientPayload, UpdateClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    client_repo: ClientRepository,
}

impl ClientService {
    pub fn new(client_repo: ClientRepository) -> Self {
        Self { client_repo }
    }

    pub async fn list(&self) -> Result<Vec<Client>, AppError> {
        self.client_repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Client, AppError> {
        self.client_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado.".to_string()))
    }

    pub async fn create(
        &self,
        payload: CreateClientPayload,
        created_by: i64,
    ) -> Result<ActionResult, AppError> {
        payload.validate()?;
        if !payload.nombre_valido() {
            return Err(AppError::BusinessRule(
                "El nombre o la razón social es obligatorio.".to_string(),
            ));
        }

        let client = self.client_repo.insert(&payload, created_by).await?;
        tracing::info!("✅ Cliente {} registrado ({})", client.id, client.doc_number);
        Ok(ActionResult::ok("Cliente registrado."))
    }

    pub async fn update(
        &self,
        id: i64,
        payload: UpdateClientPayload,
    ) -> Result<ActionResult, AppError> {
        payload.validate()?;
        self.client_repo
            .update(id, &payload)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente no encontrado.".to_string()))?;
        Ok(ActionResult::ok("Cliente actualizado."))
    }

    pub async fn delete(&self, id: i64) -> Result<ActionResult, AppError> {
        let deleted = self.client_repo.soft_delete(id).await?;
        if !deleted {
            return Err(AppError::NotFound("Cliente no encontrado.".to_string()));
        }
        Ok(ActionResult::ok("Cliente eliminado."))
    }
}
