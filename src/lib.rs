// src/lib.rs
//
// Exposto como lib para que os testes de integração consigam importar
// a lógica de domínio (máquina de estados, projeções de estoque, etc).

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
