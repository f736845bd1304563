// src/services/product_service.rs

use sqlx::PgPool;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ActionResult},
    db::ProductRepository,
    models::products::{CreateProductPayload, Product, ProductSearchRow, product_code},
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    pool: PgPool,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, pool: PgPool) -> Self {
        Self { product_repo, pool }
    }

    pub async fn create(
        &self,
        payload: CreateProductPayload,
        created_by: i64,
    ) -> Result<ActionResult, AppError> {
        payload.validate()?;

        // Nome guardado em caixa alta, como o sistema original exibe
        let name = payload.name.trim().to_uppercase();
        let description = payload
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        if self
            .product_repo
            .find_active_by_name(&self.pool, &name)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("El producto ya existe.".to_string()));
        }

        let id = self.product_repo.next_id().await?;
        let product = self
            .product_repo
            .insert(
                id,
                &product_code(id),
                &name,
                description,
                payload.unit_measure.trim(),
                created_by,
            )
            .await?;

        tracing::info!("✅ Produto {} criado", product.code);
        Ok(ActionResult::ok(format!("Producto creado: {}", product.code)))
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.list_active().await
    }

    pub async fn search(&self, term: &str) -> Result<Vec<ProductSearchRow>, AppError> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.product_repo.search(term).await
    }
}
