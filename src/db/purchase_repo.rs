// src/db/purchase_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::purchases::{
        DocumentKind, DocumentStatus, InvoiceRef, InvoiceRow, Payment, PurchaseRequest, Quotation,
        RequestStatus, RequestSummary,
    },
};

const REQUEST_COLUMNS: &str = r#"
    id, branch_id, requester_id, issue_date, description,
    estimated_total, currency, status, approval_comment,
    approved_by, approved_at, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Solicitudes ---

    pub async fn list_requests(&self) -> Result<Vec<RequestSummary>, AppError> {
        let rows = sqlx::query_as::<_, RequestSummary>(
            r#"
            SELECT
                r.id, r.branch_id, b.name AS branch_name,
                u.full_name AS requester_name,
                r.issue_date, r.description, r.estimated_total, r.currency,
                r.status, r.approval_comment, r.created_at
            FROM purchase_requests r
            JOIN branches b ON b.id = r.branch_id
            JOIN users u ON u.id = r.requester_id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_request(&self, id: i64) -> Result<Option<PurchaseRequest>, AppError> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM purchase_requests WHERE id = $1");
        let request = sqlx::query_as::<_, PurchaseRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(request)
    }

    // Tranca a solicitud enquanto a transação valida o estado e escreve.
    // Sem isso duas execuções simultâneas poderiam passar pelo mesmo gate.
    pub async fn find_request_for_update<'e, E>(
        &self,
        executor: E,
        id: i64,
    ) -> Result<Option<PurchaseRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM purchase_requests WHERE id = $1 FOR UPDATE");
        let request = sqlx::query_as::<_, PurchaseRequest>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(request)
    }

    pub async fn insert_request<'e, E>(
        &self,
        executor: E,
        branch_id: i64,
        requester_id: i64,
        issue_date: NaiveDate,
        description: &str,
        estimated_total: Decimal,
        currency: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO purchase_requests
                (branch_id, requester_id, issue_date, description, estimated_total, currency)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(branch_id)
        .bind(requester_id)
        .bind(issue_date)
        .bind(description)
        .bind(estimated_total)
        .bind(currency)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn update_request<'e, E>(
        &self,
        executor: E,
        id: i64,
        issue_date: NaiveDate,
        description: &str,
        estimated_total: Decimal,
        currency: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE purchase_requests
            SET issue_date = $2, description = $3, estimated_total = $4,
                currency = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(issue_date)
        .bind(description)
        .bind(estimated_total)
        .bind(currency)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Aprovação ou rechazo: grava quem decidiu, quando e o comentário
    pub async fn set_decision<'e, E>(
        &self,
        executor: E,
        id: i64,
        status: RequestStatus,
        comment: Option<&str>,
        decided_by: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE purchase_requests
            SET status = $2, approval_comment = $3,
                approved_by = $4, approved_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(comment)
        .bind(decided_by)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: i64,
        status: RequestStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE purchase_requests SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
        Ok(())
    }

    // --- Cotações ---

    pub async fn insert_quotation<'e, E>(
        &self,
        executor: E,
        request_id: i64,
        file_name: &str,
        file_path: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "INSERT INTO purchase_quotations (request_id, file_name, file_path) VALUES ($1, $2, $3)",
        )
        .bind(request_id)
        .bind(file_name)
        .bind(file_path)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn quotations_by_request(&self, request_id: i64) -> Result<Vec<Quotation>, AppError> {
        let rows = sqlx::query_as::<_, Quotation>(
            r#"
            SELECT id, request_id, file_name, file_path, is_selected
            FROM purchase_quotations
            WHERE request_id = $1
            ORDER BY id
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Devolve os paths removidos para o chamador apagar os arquivos físicos
    pub async fn delete_quotations<'e, E>(
        &self,
        executor: E,
        request_id: i64,
    ) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let paths = sqlx::query_scalar::<_, String>(
            "DELETE FROM purchase_quotations WHERE request_id = $1 RETURNING file_path",
        )
        .bind(request_id)
        .fetch_all(executor)
        .await?;
        Ok(paths)
    }

    pub async fn clear_quotation_selection<'e, E>(
        &self,
        executor: E,
        request_id: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE purchase_quotations SET is_selected = FALSE WHERE request_id = $1")
            .bind(request_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // O filtro por request_id impede marcar cotação de outra solicitud
    pub async fn select_quotation<'e, E>(
        &self,
        executor: E,
        quotation_id: i64,
        request_id: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE purchase_quotations SET is_selected = TRUE WHERE id = $1 AND request_id = $2",
        )
        .bind(quotation_id)
        .bind(request_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Provedores ---

    // Upsert pela chave natural (RUC). O nome sempre é atualizado para o
    // mais recente digitado; o endereço só quando vier preenchido.
    pub async fn upsert_provider<'e, E>(
        &self,
        executor: E,
        ruc: &str,
        name: &str,
        address: Option<&str>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO providers (ruc, name, address)
            VALUES ($1, $2, $3)
            ON CONFLICT (ruc) DO UPDATE
            SET name = EXCLUDED.name,
                address = COALESCE(EXCLUDED.address, providers.address)
            RETURNING id
            "#,
        )
        .bind(ruc)
        .bind(name)
        .bind(address)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    // --- Faturas ---

    pub async fn find_invoice_id<'e, E>(
        &self,
        executor: E,
        provider_id: i64,
        invoice_number: &str,
    ) -> Result<Option<i64>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM purchase_invoices WHERE provider_id = $1 AND invoice_number = $2",
        )
        .bind(provider_id)
        .bind(invoice_number)
        .fetch_optional(executor)
        .await?;
        Ok(id)
    }

    pub async fn insert_invoice<'e, E>(
        &self,
        executor: E,
        request_id: i64,
        provider_id: i64,
        invoice_number: &str,
        invoice_path: &str,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO purchase_invoices (request_id, provider_id, invoice_number, invoice_path)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(request_id)
        .bind(provider_id)
        .bind(invoice_number)
        .bind(invoice_path)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn invoices_by_request(&self, request_id: i64) -> Result<Vec<InvoiceRow>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT
                i.id, i.request_id, i.invoice_number, i.invoice_path,
                i.status, i.observation,
                p.ruc AS provider_ruc, p.name AS provider_name,
                i.created_at
            FROM purchase_invoices i
            JOIN providers p ON p.id = i.provider_id
            WHERE i.request_id = $1
            ORDER BY i.created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Combo da recepção: só id e número. Fatura rechazada não recebe
    // mercadoria, então sai da lista.
    pub async fn invoice_refs_by_request(
        &self,
        request_id: i64,
    ) -> Result<Vec<InvoiceRef>, AppError> {
        let rows = sqlx::query_as::<_, InvoiceRef>(
            r#"
            SELECT id, invoice_number
            FROM purchase_invoices
            WHERE request_id = $1 AND status != 'RECHAZADO'
            ORDER BY created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // --- Vouchers de pagamento ---

    // O número de operação é único no sistema inteiro. Devolve (id da linha,
    // fatura dona) para o chamador decidir entre pular e abortar.
    pub async fn find_payment_by_voucher_number<'e, E>(
        &self,
        executor: E,
        voucher_number: &str,
    ) -> Result<Option<(i64, i64)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, (i64, i64)>(
            "SELECT id, invoice_id FROM purchase_payments WHERE voucher_number = $1",
        )
        .bind(voucher_number)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        invoice_id: i64,
        voucher_number: &str,
        payment_proof_path: &str,
        payment_date: NaiveDate,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO purchase_payments
                (invoice_id, voucher_number, payment_proof_path, payment_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(invoice_id)
        .bind(voucher_number)
        .bind(payment_proof_path)
        .bind(payment_date)
        .fetch_one(executor)
        .await?;
        Ok(id)
    }

    pub async fn payments_by_request(&self, request_id: i64) -> Result<Vec<Payment>, AppError> {
        let rows = sqlx::query_as::<_, Payment>(
            r#"
            SELECT
                pp.id, pp.invoice_id, pp.voucher_number, pp.payment_proof_path,
                pp.payment_date, pp.status, pp.observation, pp.created_at
            FROM purchase_payments pp
            JOIN purchase_invoices i ON i.id = pp.invoice_id
            WHERE i.request_id = $1
            ORDER BY pp.created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // --- Revisão contábil ---

    // Só documentos PENDIENTE podem ser revisados. rows_affected = 0
    // significa documento inexistente ou já revisado.
    pub async fn review_document<'e, E>(
        &self,
        executor: E,
        kind: DocumentKind,
        document_id: i64,
        status: DocumentStatus,
        observation: Option<&str>,
        reviewed_by: i64,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match kind {
            DocumentKind::Factura => {
                r#"
                UPDATE purchase_invoices
                SET status = $2, observation = $3, validated_by = $4, validated_at = NOW()
                WHERE id = $1 AND status = 'PENDIENTE'
                "#
            }
            DocumentKind::Voucher => {
                r#"
                UPDATE purchase_payments
                SET status = $2, observation = $3, validated_by = $4, validated_at = NOW()
                WHERE id = $1 AND status = 'PENDIENTE'
                "#
            }
        };
        let result = sqlx::query(sql)
            .bind(document_id)
            .bind(status)
            .bind(observation)
            .bind(reviewed_by)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Status de todas as faturas e vouchers da solicitud, para o gate de
    // fechamento (quem decide o que trava é DocumentStatus::bloquea_cierre)
    pub async fn document_statuses<'e, E>(
        &self,
        executor: E,
        request_id: i64,
    ) -> Result<Vec<DocumentStatus>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let statuses = sqlx::query_scalar::<_, DocumentStatus>(
            r#"
            SELECT status FROM purchase_invoices WHERE request_id = $1
            UNION ALL
            SELECT pp.status FROM purchase_payments pp
            JOIN purchase_invoices i ON i.id = pp.invoice_id
            WHERE i.request_id = $1
            "#,
        )
        .bind(request_id)
        .fetch_all(executor)
        .await?;
        Ok(statuses)
    }
}
