// src/db.rs

// Camada de acesso a dados. Cada repositório cuida de uma família de
// tabelas; métodos que participam de transações recebem um Executor.
pub mod catalog_repo;
pub mod client_repo;
pub mod inventory_repo;
pub mod product_repo;
pub mod purchase_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepository;
pub use client_repo::ClientRepository;
pub use inventory_repo::InventoryRepository;
pub use product_repo::ProductRepository;
pub use purchase_repo::PurchaseRepository;
pub use user_repo::UserRepository;
