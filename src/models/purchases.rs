// src/models/purchases.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- 1. Máquina de estados da solicitud ---

/// Ciclo de vida: PENDIENTE -> {APROBADO, RECHAZADO};
/// APROBADO -> {COMPRA REALIZADA, COMPLETADO} -> VALIDADA.
/// RECHAZADO e VALIDADA são terminais: nenhuma operação de escrita passa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status")]
pub enum RequestStatus {
    #[sqlx(rename = "PENDIENTE")]
    #[serde(rename = "PENDIENTE")]
    Pendiente,
    #[sqlx(rename = "APROBADO")]
    #[serde(rename = "APROBADO")]
    Aprobado,
    #[sqlx(rename = "RECHAZADO")]
    #[serde(rename = "RECHAZADO")]
    Rechazado,
    #[sqlx(rename = "COMPRA REALIZADA")]
    #[serde(rename = "COMPRA REALIZADA")]
    CompraRealizada,
    #[sqlx(rename = "COMPLETADO")]
    #[serde(rename = "COMPLETADO")]
    Completado,
    #[sqlx(rename = "VALIDADA")]
    #[serde(rename = "VALIDADA")]
    Validada,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pendiente => "PENDIENTE",
            RequestStatus::Aprobado => "APROBADO",
            RequestStatus::Rechazado => "RECHAZADO",
            RequestStatus::CompraRealizada => "COMPRA REALIZADA",
            RequestStatus::Completado => "COMPLETADO",
            RequestStatus::Validada => "VALIDADA",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rechazado | RequestStatus::Validada)
    }

    /// A solicitud só é editável enquanto ninguém decidiu nada sobre ela.
    pub fn can_edit(&self) -> bool {
        matches!(self, RequestStatus::Pendiente)
    }

    /// Aprovar e rechazar partem do mesmo estado.
    pub fn can_decide(&self) -> bool {
        matches!(self, RequestStatus::Pendiente)
    }

    /// Faturas/vouchers só entram depois da aprovação e antes do fechamento.
    pub fn can_register_execution(&self) -> bool {
        matches!(
            self,
            RequestStatus::Aprobado | RequestStatus::CompraRealizada | RequestStatus::Completado
        )
    }

    pub fn can_complete(&self) -> bool {
        matches!(self, RequestStatus::Aprobado | RequestStatus::CompraRealizada)
    }

    pub fn can_receive(&self) -> bool {
        matches!(
            self,
            RequestStatus::Aprobado | RequestStatus::CompraRealizada | RequestStatus::Completado
        )
    }

    pub fn can_close(&self) -> bool {
        matches!(self, RequestStatus::CompraRealizada | RequestStatus::Completado)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status individual de fatura/voucher na revisão.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pendiente,
    Validado,
    Rechazado,
}

impl DocumentStatus {
    /// Só documentos VALIDADO liberam o fechamento da solicitud;
    /// PENDIENTE e RECHAZADO travam igualmente.
    pub fn bloquea_cierre(&self) -> bool {
        !matches!(self, DocumentStatus::Validado)
    }
}

/// Tipo do documento revisável, usado no path da rota de validação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Factura,
    Voucher,
}

// --- 2. Regras puras (testáveis sem banco) ---

pub const MIN_REJECT_REASON_LEN: usize = 5;

/// Motivo de rechazo: obrigatório, mínimo 5 caracteres úteis.
pub fn motivo_rechazo_valido(reason: &str) -> bool {
    reason.trim().chars().count() >= MIN_REJECT_REASON_LEN
}

/// Decisão sobre um voucher na etapa de execução.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherDisposition {
    /// Número inédito: exige arquivo e insere como PENDIENTE.
    Nueva,
    /// Mesmo par (número, fatura) já registrado: reenvio idempotente, pula.
    Duplicada,
    /// Número já usado em OUTRA fatura: erro, lote inteiro sofre rollback.
    Conflicto,
}

/// `existing_invoice_id` é a fatura dona do voucher já registrado com esse
/// número (se houver). A unicidade do número é global no sistema.
pub fn voucher_disposition(
    current_invoice_id: i64,
    existing_invoice_id: Option<i64>,
) -> VoucherDisposition {
    match existing_invoice_id {
        None => VoucherDisposition::Nueva,
        Some(id) if id == current_invoice_id => VoucherDisposition::Duplicada,
        Some(_) => VoucherDisposition::Conflicto,
    }
}

// --- 3. Linhas do banco ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub id: i64,
    pub branch_id: i64,
    pub requester_id: i64,
    pub issue_date: NaiveDate,
    pub description: String,
    pub estimated_total: Decimal,
    pub currency: String,
    pub status: RequestStatus,
    pub approval_comment: Option<String>,
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha do listado geral, com nomes resolvidos.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: i64,
    pub branch_id: i64,
    pub branch_name: String,
    pub requester_name: String,
    pub issue_date: NaiveDate,
    pub description: String,
    pub estimated_total: Decimal,
    pub currency: String,
    pub status: RequestStatus,
    pub approval_comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: i64,
    pub request_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: i64,
    pub ruc: String,
    pub name: String,
    pub address: Option<String>,
}

/// Fatura com os dados do provedor, como a tela de execução consome.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRow {
    pub id: i64,
    pub request_id: i64,
    pub invoice_number: String,
    pub invoice_path: String,
    pub status: DocumentStatus,
    pub observation: Option<String>,
    pub provider_ruc: String,
    pub provider_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub invoice_id: i64,
    pub voucher_number: String,
    pub payment_proof_path: String,
    pub payment_date: NaiveDate,
    pub status: DocumentStatus,
    pub observation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fatura + vouchers, montada pelo service.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceWithVouchers {
    #[serde(flatten)]
    pub invoice: InvoiceRow,
    pub vouchers: Vec<Payment>,
}

/// Detalhe da solicitud com as cotações anexadas.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    pub request: PurchaseRequest,
    pub quotations: Vec<Quotation>,
}

/// Referência mínima de fatura (combo da recepção).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRef {
    pub id: i64,
    pub invoice_number: String,
}

// --- 4. Entradas da etapa de execução ---

/// Um grupo de fatura do campo `data` (JSON) do formulário multipart.
/// Os arquivos chegam em partes separadas: `file_invoice_{tempId}` e
/// `file_voucher_{tempId}_{voucherTempId}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceGroupInput {
    pub temp_id: String,
    pub provider_ruc: String,
    pub provider_name: String,
    /// Endereço/sede do provedor (campo providerBranch no frontend)
    pub provider_branch: Option<String>,
    pub number: String,
    #[serde(default)]
    pub vouchers: Vec<VoucherInput>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoucherInput {
    pub temp_id: String,
    pub number: String,
    pub date: NaiveDate,
}
