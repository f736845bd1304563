// src/services/mod.rs

pub mod auth;
pub mod client_service;
pub mod inventory_service;
pub mod product_service;
pub mod purchase_service;

pub use auth::AuthService;
pub use client_service::ClientService;
pub use inventory_service::InventoryService;
pub use product_service::ProductService;
pub use purchase_service::PurchaseService;
