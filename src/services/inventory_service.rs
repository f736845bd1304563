// src/services/inventory_service.rs

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        response::ActionResult,
        storage::{FileStorage, UploadCategory, UploadedFile},
    },
    db::{InventoryRepository, ProductRepository, PurchaseRepository, inventory_repo::NewMovement},
    models::{
        auth::User,
        inventory::{
            AdjustmentPayload, MovementConcept, MovementHistoryPage, MovementType,
            ReceptionItemInput, ReceptionSummary, StockView, next_stock_balance,
        },
    },
};

/// Campos do formulário multipart da recepção física.
pub struct ReceptionForm {
    pub invoice_id: Option<i64>,
    pub guide_number: Option<String>,
    pub guide_file: Option<UploadedFile>,
    pub items: Vec<ReceptionItemInput>,
}

pub struct HistoryParams {
    pub product_id: i64,
    pub branch_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    product_repo: ProductRepository,
    purchase_repo: PurchaseRepository,
    storage: FileStorage,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(
        inventory_repo: InventoryRepository,
        product_repo: ProductRepository,
        purchase_repo: PurchaseRepository,
        storage: FileStorage,
        pool: PgPool,
    ) -> Self {
        Self { inventory_repo, product_repo, purchase_repo, storage, pool }
    }

    // --- Recepção física da compra ---

    // Cada item vira um INGRESO/COMPRA no livro-razão e soma no saldo da
    // sucursal da solicitud. Produto resolvido por id ou por nome exato;
    // nome desconhecido aborta o lote inteiro.
    pub async fn register_reception(
        &self,
        request_id: i64,
        user: &User,
        form: ReceptionForm,
    ) -> Result<ActionResult, AppError> {
        let guide_number = form
            .guide_number
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty());

        let guide_path = match &form.guide_file {
            Some(file) => Some(
                self.storage
                    .save(UploadCategory::Recepciones, &file.file_name, &file.data)
                    .await?,
            ),
            None => None,
        };

        let mut tx = self.pool.begin().await?;
        let request = self
            .purchase_repo
            .find_request_for_update(&mut *tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solicitud no encontrada.".to_string()))?;
        if !request.status.can_receive() {
            return Err(AppError::BusinessRule(format!(
                "No se puede recepcionar en estado: {}.",
                request.status
            )));
        }

        let branch_id = request.branch_id;
        let mut received = 0usize;

        for item in &form.items {
            if item.quantity <= Decimal::ZERO {
                continue;
            }

            let product = match item.product_id {
                Some(product_id) => self
                    .product_repo
                    .find_by_id(&mut *tx, product_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Producto {product_id} no encontrado."))
                    })?,
                None => {
                    let name = item
                        .product_name
                        .as_deref()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .ok_or(AppError::MissingField("productName"))?;
                    self.product_repo
                        .find_active_by_name(&mut *tx, name)
                        .await?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("Producto '{name}' no encontrado."))
                        })?
                }
            };

            let unit_measure = item
                .unit_measure
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .unwrap_or(&product.unit_measure);

            self.inventory_repo
                .insert_movement(
                    &mut *tx,
                    &NewMovement {
                        branch_id,
                        user_id: user.id,
                        movement_type: MovementType::Ingreso,
                        concept: MovementConcept::Compra,
                        request_id: Some(request_id),
                        invoice_id: form.invoice_id,
                        product_id: product.id,
                        quantity: item.quantity,
                        unit_measure,
                        document_number: guide_number,
                        document_path: guide_path.as_deref(),
                    },
                )
                .await?;
            self.inventory_repo
                .upsert_stock_add(&mut *tx, branch_id, product.id, item.quantity)
                .await?;
            received += 1;
        }

        if received == 0 {
            return Err(AppError::BusinessRule(
                "No hay ítems válidos para recepcionar.".to_string(),
            ));
        }
        tx.commit().await?;

        tracing::info!(
            "✅ Recepción de la solicitud {}: {} ítem(s) por {}",
            request_id,
            received,
            user.email
        );
        Ok(ActionResult::ok(format!("Recepción registrada: {received} ítem(s).")))
    }

    pub async fn receptions(&self, request_id: i64) -> Result<Vec<ReceptionSummary>, AppError> {
        self.inventory_repo.receptions_by_request(request_id).await
    }

    // --- Ajuste manual ---

    pub async fn manual_adjustment(
        &self,
        user: &User,
        payload: AdjustmentPayload,
    ) -> Result<ActionResult, AppError> {
        if payload.quantity <= Decimal::ZERO {
            return Err(AppError::BusinessRule(
                "La cantidad debe ser mayor a cero.".to_string(),
            ));
        }

        // Perfis de sucursal só mexem no próprio estoque
        let branch_id = if user.role.puede_elegir_sucursal() {
            payload.branch_id.ok_or(AppError::MissingField("branchId"))?
        } else {
            user.branch_id.ok_or_else(|| {
                AppError::BusinessRule("El usuario no tiene sucursal asignada.".to_string())
            })?
        };

        let reason = payload
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        let mut tx = self.pool.begin().await?;
        let product = self
            .product_repo
            .find_by_id(&mut *tx, payload.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Producto no encontrado.".to_string()))?;

        let current = self
            .inventory_repo
            .get_stock_for_update(&mut *tx, branch_id, product.id)
            .await?;

        match next_stock_balance(current, payload.movement_type, payload.quantity) {
            Ok(new_balance) => match payload.movement_type {
                MovementType::Ingreso => {
                    self.inventory_repo
                        .upsert_stock_add(&mut *tx, branch_id, product.id, payload.quantity)
                        .await?;
                }
                MovementType::Salida => {
                    self.inventory_repo
                        .set_stock_balance(&mut *tx, branch_id, product.id, new_balance)
                        .await?;
                }
            },
            Err(falta) => {
                return Err(match falta.disponible {
                    Some(disponible) => AppError::StockInsuficiente(disponible),
                    None => AppError::BusinessRule(
                        "No hay stock registrado para descontar.".to_string(),
                    ),
                });
            }
        }

        self.inventory_repo
            .insert_movement(
                &mut *tx,
                &NewMovement {
                    branch_id,
                    user_id: user.id,
                    movement_type: payload.movement_type,
                    concept: MovementConcept::Ajuste,
                    request_id: None,
                    invoice_id: None,
                    product_id: product.id,
                    quantity: payload.quantity,
                    unit_measure: &product.unit_measure,
                    document_number: reason,
                    document_path: None,
                },
            )
            .await?;
        tx.commit().await?;

        tracing::info!(
            "✅ Ajuste de estoque: produto {} na sucursal {} por {}",
            product.code,
            branch_id,
            user.email
        );
        Ok(ActionResult::ok("Ajuste registrado."))
    }

    // --- Leituras ---

    pub async fn stock_list(
        &self,
        user: &User,
        branch_id: Option<i64>,
        term: Option<&str>,
    ) -> Result<Vec<StockView>, AppError> {
        let branch_filter = if user.role.puede_elegir_sucursal() {
            branch_id
        } else {
            user.branch_id
        };
        let rows = self.inventory_repo.stock_list(branch_filter, term).await?;
        Ok(rows.into_iter().map(StockView::from).collect())
    }

    pub async fn product_history(
        &self,
        params: HistoryParams,
    ) -> Result<MovementHistoryPage, AppError> {
        let limit = params.limit.clamp(1, 100);
        let page = params.page.max(1);
        let offset = (page - 1) * limit;
        // Limite superior exclusivo: o dia final entra inteiro na janela
        let end_exclusive = params
            .end_date
            .and_then(|d| d.checked_add_days(Days::new(1)));

        let total = self
            .inventory_repo
            .product_history_count(
                params.product_id,
                params.branch_id,
                params.start_date,
                end_exclusive,
            )
            .await?;
        let data = self
            .inventory_repo
            .product_history(
                params.product_id,
                params.branch_id,
                params.start_date,
                end_exclusive,
                limit,
                offset,
            )
            .await?;

        Ok(MovementHistoryPage {
            data,
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        })
    }
}
