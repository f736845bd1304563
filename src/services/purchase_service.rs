// src/services/purchase_service.rs

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        response::ActionResult,
        storage::{FileStorage, UploadCategory, UploadedFile},
    },
    db::PurchaseRepository,
    models::{
        auth::User,
        catalog::CURRENCIES,
        purchases::{
            DocumentKind, DocumentStatus, InvoiceGroupInput, InvoiceRef, InvoiceWithVouchers,
            PurchaseRequest,
            RequestDetails, RequestStatus, RequestSummary, VoucherDisposition,
            motivo_rechazo_valido, voucher_disposition,
        },
    },
};

/// Campos do formulário multipart de criação/edição de solicitud.
pub struct RequestForm {
    pub branch_id: Option<i64>,
    pub issue_date: Option<NaiveDate>,
    pub description: String,
    pub estimated_total: Decimal,
    pub currency: String,
    pub quotations: Vec<UploadedFile>,
}

#[derive(Clone)]
pub struct PurchaseService {
    purchase_repo: PurchaseRepository,
    storage: FileStorage,
    pool: PgPool,
}

impl PurchaseService {
    pub fn new(purchase_repo: PurchaseRepository, storage: FileStorage, pool: PgPool) -> Self {
        Self { purchase_repo, storage, pool }
    }

    // --- Leituras ---

    pub async fn list_requests(&self) -> Result<Vec<RequestSummary>, AppError> {
        self.purchase_repo.list_requests().await
    }

    pub async fn request_details(&self, id: i64) -> Result<RequestDetails, AppError> {
        let request = self.find_request(id).await?;
        let quotations = self.purchase_repo.quotations_by_request(id).await?;
        Ok(RequestDetails { request, quotations })
    }

    pub async fn invoice_refs(&self, id: i64) -> Result<Vec<InvoiceRef>, AppError> {
        self.purchase_repo.invoice_refs_by_request(id).await
    }

    pub async fn execution_view(&self, id: i64) -> Result<Vec<InvoiceWithVouchers>, AppError> {
        let invoices = self.purchase_repo.invoices_by_request(id).await?;
        let mut payments = self.purchase_repo.payments_by_request(id).await?;

        let mut view: Vec<InvoiceWithVouchers> = invoices
            .into_iter()
            .map(|invoice| InvoiceWithVouchers { invoice, vouchers: Vec::new() })
            .collect();
        for payment in payments.drain(..) {
            if let Some(entry) = view.iter_mut().find(|v| v.invoice.id == payment.invoice_id) {
                entry.vouchers.push(payment);
            }
        }
        Ok(view)
    }

    // --- Criação e edição ---

    pub async fn create_request(
        &self,
        user: &User,
        form: RequestForm,
    ) -> Result<ActionResult, AppError> {
        validar_formulario(&form)?;
        if form.quotations.is_empty() {
            return Err(AppError::BusinessRule(
                "Adjunte al menos una cotización.".to_string(),
            ));
        }
        let branch_id = resolver_sucursal(user, form.branch_id)?;
        let issue_date = form.issue_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut saved = Vec::with_capacity(form.quotations.len());
        for file in &form.quotations {
            let path = self
                .storage
                .save(UploadCategory::Cotizaciones, &file.file_name, &file.data)
                .await?;
            saved.push((file.file_name.clone(), path));
        }

        let mut tx = self.pool.begin().await?;
        let request_id = self
            .purchase_repo
            .insert_request(
                &mut *tx,
                branch_id,
                user.id,
                issue_date,
                form.description.trim(),
                form.estimated_total,
                &form.currency,
            )
            .await?;
        for (file_name, path) in &saved {
            self.purchase_repo
                .insert_quotation(&mut *tx, request_id, file_name, path)
                .await?;
        }
        tx.commit().await?;

        tracing::info!("✅ Solicitud {} registrada por {}", request_id, user.email);
        Ok(ActionResult::ok("Solicitud registrada."))
    }

    pub async fn update_request(
        &self,
        id: i64,
        user: &User,
        form: RequestForm,
    ) -> Result<ActionResult, AppError> {
        validar_formulario(&form)?;

        let mut tx = self.pool.begin().await?;
        let request = self
            .purchase_repo
            .find_request_for_update(&mut *tx, id)
            .await?
            .ok_or_else(solicitud_no_encontrada)?;
        if !request.status.can_edit() {
            return Err(AppError::BusinessRule(format!(
                "No se puede editar en estado: {}.",
                request.status
            )));
        }

        // Só grava os arquivos depois do gate: edição barrada não pode
        // deixar upload órfão em disco
        let mut saved = Vec::with_capacity(form.quotations.len());
        for file in &form.quotations {
            let path = self
                .storage
                .save(UploadCategory::Cotizaciones, &file.file_name, &file.data)
                .await?;
            saved.push((file.file_name.clone(), path));
        }

        let issue_date = form.issue_date.unwrap_or(request.issue_date);
        self.purchase_repo
            .update_request(
                &mut *tx,
                id,
                issue_date,
                form.description.trim(),
                form.estimated_total,
                &form.currency,
            )
            .await?;

        // Cotações novas substituem TODAS as anteriores
        let mut removed_paths = Vec::new();
        if !saved.is_empty() {
            removed_paths = self.purchase_repo.delete_quotations(&mut *tx, id).await?;
            for (file_name, path) in &saved {
                self.purchase_repo
                    .insert_quotation(&mut *tx, id, file_name, path)
                    .await?;
            }
        }
        tx.commit().await?;

        for path in removed_paths {
            self.storage.remove(&path).await;
        }
        tracing::info!("✅ Solicitud {} atualizada por {}", id, user.email);
        Ok(ActionResult::ok("Solicitud actualizada."))
    }

    // --- Decisão ---

    pub async fn approve(
        &self,
        id: i64,
        approver: &User,
        comment: Option<&str>,
        selected_quotation_id: Option<i64>,
    ) -> Result<ActionResult, AppError> {
        let mut tx = self.pool.begin().await?;
        let request = self
            .purchase_repo
            .find_request_for_update(&mut *tx, id)
            .await?
            .ok_or_else(solicitud_no_encontrada)?;
        if !request.status.can_decide() {
            return Err(AppError::BusinessRule(format!(
                "No se puede aprobar en estado: {}.",
                request.status
            )));
        }

        if let Some(quotation_id) = selected_quotation_id {
            self.purchase_repo
                .clear_quotation_selection(&mut *tx, id)
                .await?;
            let selected = self
                .purchase_repo
                .select_quotation(&mut *tx, quotation_id, id)
                .await?;
            if !selected {
                return Err(AppError::NotFound("Cotización no encontrada.".to_string()));
            }
        }

        let comment = comment.map(str::trim).filter(|c| !c.is_empty());
        self.purchase_repo
            .set_decision(&mut *tx, id, RequestStatus::Aprobado, comment, approver.id)
            .await?;
        tx.commit().await?;

        tracing::info!("✅ Solicitud {} aprobada por {}", id, approver.email);
        Ok(ActionResult::ok("Solicitud aprobada."))
    }

    pub async fn reject(
        &self,
        id: i64,
        approver: &User,
        reason: &str,
    ) -> Result<ActionResult, AppError> {
        if !motivo_rechazo_valido(reason) {
            return Err(AppError::BusinessRule(
                "El motivo del rechazo es obligatorio (mínimo 5 caracteres).".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let request = self
            .purchase_repo
            .find_request_for_update(&mut *tx, id)
            .await?
            .ok_or_else(solicitud_no_encontrada)?;
        if !request.status.can_decide() {
            return Err(AppError::BusinessRule(format!(
                "No se puede rechazar en estado: {}.",
                request.status
            )));
        }

        self.purchase_repo
            .set_decision(
                &mut *tx,
                id,
                RequestStatus::Rechazado,
                Some(reason.trim()),
                approver.id,
            )
            .await?;
        tx.commit().await?;
        Ok(ActionResult::ok("Solicitud rechazada."))
    }

    // --- Execução da compra ---

    // Registro em lote de faturas e vouchers. Qualquer conflito de voucher
    // aborta a transação inteira; reenvios de pares já gravados são pulados.
    pub async fn register_execution(
        &self,
        id: i64,
        user: &User,
        groups: Vec<InvoiceGroupInput>,
        mut files: HashMap<String, UploadedFile>,
    ) -> Result<ActionResult, AppError> {
        if groups.is_empty() {
            return Err(AppError::BusinessRule(
                "No hay facturas para registrar.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let request = self
            .purchase_repo
            .find_request_for_update(&mut *tx, id)
            .await?
            .ok_or_else(solicitud_no_encontrada)?;
        if !request.status.can_register_execution() {
            return Err(AppError::BusinessRule(format!(
                "No se puede registrar compras en estado: {}.",
                request.status
            )));
        }

        let mut new_invoices = 0usize;
        let mut new_vouchers = 0usize;

        for group in &groups {
            let ruc = group.provider_ruc.trim();
            let number = group.number.trim();
            if ruc.is_empty() || number.is_empty() {
                return Err(AppError::BusinessRule(
                    "El RUC y el número de factura son obligatorios.".to_string(),
                ));
            }

            let provider_id = self
                .purchase_repo
                .upsert_provider(
                    &mut *tx,
                    ruc,
                    group.provider_name.trim(),
                    group.provider_branch.as_deref().map(str::trim),
                )
                .await?;

            // Mesma fatura reenviada: reusa a linha, não exige o arquivo
            let invoice_id = match self
                .purchase_repo
                .find_invoice_id(&mut *tx, provider_id, number)
                .await?
            {
                Some(existing) => existing,
                None => {
                    let key = format!("file_invoice_{}", group.temp_id);
                    let file = files.remove(&key).ok_or_else(|| {
                        AppError::MissingFile(format!("Falta el archivo de la factura {number}."))
                    })?;
                    let path = self
                        .storage
                        .save(UploadCategory::Ejecuciones, &file.file_name, &file.data)
                        .await?;
                    new_invoices += 1;
                    self.purchase_repo
                        .insert_invoice(&mut *tx, id, provider_id, number, &path)
                        .await?
                }
            };

            for voucher in &group.vouchers {
                let voucher_number = voucher.number.trim();
                if voucher_number.is_empty() {
                    continue;
                }
                let existing = self
                    .purchase_repo
                    .find_payment_by_voucher_number(&mut *tx, voucher_number)
                    .await?;
                match voucher_disposition(invoice_id, existing.map(|(_, inv)| inv)) {
                    VoucherDisposition::Duplicada => continue,
                    VoucherDisposition::Conflicto => {
                        return Err(AppError::VoucherEnUso(format!(
                            "El N° de Operación {voucher_number} ya fue utilizado."
                        )));
                    }
                    VoucherDisposition::Nueva => {
                        let key = format!("file_voucher_{}_{}", group.temp_id, voucher.temp_id);
                        let file = files.remove(&key).ok_or_else(|| {
                            AppError::MissingFile(format!(
                                "Falta el comprobante del voucher {voucher_number}."
                            ))
                        })?;
                        let path = self
                            .storage
                            .save(UploadCategory::Ejecuciones, &file.file_name, &file.data)
                            .await?;
                        self.purchase_repo
                            .insert_payment(&mut *tx, invoice_id, voucher_number, &path, voucher.date)
                            .await?;
                        new_vouchers += 1;
                    }
                }
            }
        }

        if request.status == RequestStatus::Aprobado {
            self.purchase_repo
                .set_status(&mut *tx, id, RequestStatus::CompraRealizada)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(
            "✅ Execução da solicitud {}: {} fatura(s), {} voucher(s) por {}",
            id,
            new_invoices,
            new_vouchers,
            user.email
        );
        Ok(ActionResult::ok(format!(
            "Compra registrada: {new_invoices} factura(s), {new_vouchers} voucher(s)."
        )))
    }

    pub async fn complete(&self, id: i64, user: &User) -> Result<ActionResult, AppError> {
        let mut tx = self.pool.begin().await?;
        let request = self
            .purchase_repo
            .find_request_for_update(&mut *tx, id)
            .await?
            .ok_or_else(solicitud_no_encontrada)?;
        if !request.status.can_complete() {
            return Err(AppError::BusinessRule(format!(
                "No se puede completar en estado: {}.",
                request.status
            )));
        }
        self.purchase_repo
            .set_status(&mut *tx, id, RequestStatus::Completado)
            .await?;
        tx.commit().await?;

        tracing::info!("✅ Solicitud {} completada por {}", id, user.email);
        Ok(ActionResult::ok("Proceso de compra completado."))
    }

    // --- Revisão contábil e fechamento ---

    pub async fn review_document(
        &self,
        kind: DocumentKind,
        document_id: i64,
        status: DocumentStatus,
        observation: Option<&str>,
        reviewer: &User,
    ) -> Result<ActionResult, AppError> {
        if status == DocumentStatus::Pendiente {
            return Err(AppError::BusinessRule(
                "Estado de revisión inválido.".to_string(),
            ));
        }
        let observation = observation.map(str::trim).filter(|o| !o.is_empty());
        if status == DocumentStatus::Rechazado && observation.is_none() {
            return Err(AppError::BusinessRule(
                "La observación es obligatoria al rechazar.".to_string(),
            ));
        }

        let updated = self
            .purchase_repo
            .review_document(&self.pool, kind, document_id, status, observation, reviewer.id)
            .await?;
        if !updated {
            return Err(AppError::BusinessRule(
                "El documento ya fue revisado o no existe.".to_string(),
            ));
        }
        Ok(ActionResult::ok("Documento revisado."))
    }

    // Fechamento final: só passa quando todo documento já foi VALIDADO.
    // RECHAZADO também trava: a fatura precisa ser corrigida e revisada.
    pub async fn close(&self, id: i64, user: &User) -> Result<ActionResult, AppError> {
        let mut tx = self.pool.begin().await?;
        let request = self
            .purchase_repo
            .find_request_for_update(&mut *tx, id)
            .await?
            .ok_or_else(solicitud_no_encontrada)?;
        if !request.status.can_close() {
            return Err(AppError::BusinessRule(format!(
                "No se puede validar en estado: {}.",
                request.status
            )));
        }

        let statuses = self.purchase_repo.document_statuses(&mut *tx, id).await?;
        let blocking = statuses.iter().filter(|s| s.bloquea_cierre()).count();
        if blocking > 0 {
            return Err(AppError::BusinessRule(format!(
                "Hay {blocking} documento(s) sin validar."
            )));
        }

        self.purchase_repo
            .set_status(&mut *tx, id, RequestStatus::Validada)
            .await?;
        tx.commit().await?;

        tracing::info!("✅ Solicitud {} validada por {}", id, user.email);
        Ok(ActionResult::ok("Solicitud validada."))
    }

    async fn find_request(&self, id: i64) -> Result<PurchaseRequest, AppError> {
        self.purchase_repo
            .find_request(id)
            .await?
            .ok_or_else(solicitud_no_encontrada)
    }
}

fn solicitud_no_encontrada() -> AppError {
    AppError::NotFound("Solicitud no encontrada.".to_string())
}

fn validar_formulario(form: &RequestForm) -> Result<(), AppError> {
    if form.description.trim().is_empty() {
        return Err(AppError::BusinessRule(
            "La descripción es obligatoria.".to_string(),
        ));
    }
    if form.estimated_total <= Decimal::ZERO {
        return Err(AppError::BusinessRule(
            "El monto estimado debe ser mayor a cero.".to_string(),
        ));
    }
    if !CURRENCIES.iter().any(|c| c.code == form.currency) {
        return Err(AppError::BusinessRule("Moneda inválida.".to_string()));
    }
    Ok(())
}

fn resolver_sucursal(user: &User, requested: Option<i64>) -> Result<i64, AppError> {
    if user.role.puede_elegir_sucursal() {
        requested.ok_or(AppError::MissingField("branchId"))
    } else {
        user.branch_id.ok_or_else(|| {
            AppError::BusinessRule("El usuario no tiene sucursal asignada.".to_string())
        })
    }
}
