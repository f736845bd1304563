// src/common/storage.rs

use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use crate::common::error::AppError;

/// Categoria do upload -> subpasta pública onde o arquivo é gravado.
#[derive(Debug, Clone, Copy)]
pub enum UploadCategory {
    /// Cotações anexadas à solicitud (intake)
    Cotizaciones,
    /// Faturas e vouchers da etapa de execução
    Ejecuciones,
    /// Guias de remessa da recepção física
    Recepciones,
}

impl UploadCategory {
    fn subdir(self) -> &'static str {
        match self {
            UploadCategory::Cotizaciones => "uploads",
            UploadCategory::Ejecuciones => "uploads/executions",
            UploadCategory::Recepciones => "uploads/receptions",
        }
    }
}

/// Um arquivo recebido via multipart, ainda em memória.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Grava uploads em disco sob uma raiz pública e devolve o caminho
/// relativo que fica persistido no banco.
///
/// Atenção: a gravação acontece DENTRO da requisição, antes do commit da
/// transação. Se a transação sofrer rollback o arquivo fica órfão em disco
/// (comportamento herdado do sistema original, sem limpeza compensatória).
#[derive(Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Grava `data` e devolve o caminho público (ex: "/uploads/executions/...").
    pub async fn save(
        &self,
        category: UploadCategory,
        original_name: &str,
        data: &[u8],
    ) -> Result<String, AppError> {
        let dir = self.root.join(category.subdir());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            sanitize(original_name)
        );

        tokio::fs::write(dir.join(&file_name), data).await?;
        Ok(format!("/{}/{}", category.subdir(), file_name))
    }

    /// Remoção "best effort": o original ignora falhas ao apagar cotações.
    pub async fn remove(&self, public_path: &str) {
        let relative = public_path.trim_start_matches('/');
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            tracing::warn!("No se pudo eliminar el archivo {}: {}", public_path, e);
        }
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}
