// src/config.rs

use std::{env, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    common::storage::FileStorage,
    db::{
        CatalogRepository, ClientRepository, InventoryRepository, ProductRepository,
        PurchaseRepository, UserRepository,
    },
    services::{AuthService, ClientService, InventoryService, ProductService, PurchaseService},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub catalog_repo: CatalogRepository,
    pub auth_service: AuthService,
    pub client_service: ClientService,
    pub product_service: ProductService,
    pub purchase_service: PurchaseService,
    pub inventory_service: InventoryService,
}

impl AppState {
    // Função para carregar as configurações e criar o AppState
    pub async fn new() -> Self {
        // O .env é opcional em produção; as variáveis podem vir do ambiente
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let upload_root = env::var("UPLOAD_DIR").unwrap_or_else(|_| "public".to_string());

        let db_pool = match PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await
        {
            Ok(pool) => {
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
                pool
            }
            Err(e) => {
                tracing::error!("🔥 Falha ao conectar ao banco de dados: {:?}", e);
                std::process::exit(1);
            }
        };

        let storage = FileStorage::new(upload_root);

        let user_repo = UserRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let client_repo = ClientRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let purchase_repo = PurchaseRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let client_service = ClientService::new(client_repo);
        let product_service = ProductService::new(product_repo.clone(), db_pool.clone());
        let purchase_service =
            PurchaseService::new(purchase_repo.clone(), storage.clone(), db_pool.clone());
        let inventory_service = InventoryService::new(
            inventory_repo,
            product_repo,
            purchase_repo,
            storage,
            db_pool.clone(),
        );

        Self {
            db_pool,
            catalog_repo,
            auth_service,
            client_service,
            product_service,
            purchase_service,
            inventory_service,
        }
    }
}
