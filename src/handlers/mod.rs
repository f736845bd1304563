// src/handlers/mod.rs

pub mod auth;
pub mod catalog;
pub mod clients;
pub mod inventory;
pub mod products;
pub mod purchases;
