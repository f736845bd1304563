// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Catalogos ---
        handlers::catalog::list_branches,
        handlers::catalog::list_currencies,
        handlers::catalog::list_catalog,

        // --- Clientes ---
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,

        // --- Productos ---
        handlers::products::create_product,
        handlers::products::list_products,
        handlers::products::search_products,

        // --- Compras ---
        handlers::purchases::list_requests,
        handlers::purchases::get_request,
        handlers::purchases::create_request,
        handlers::purchases::update_request,
        handlers::purchases::approve_request,
        handlers::purchases::reject_request,
        handlers::purchases::get_execution,
        handlers::purchases::register_execution,
        handlers::purchases::complete_request,
        handlers::purchases::list_invoice_refs,
        handlers::purchases::review_document,
        handlers::purchases::close_request,

        // --- Inventario ---
        handlers::inventory::get_stock,
        handlers::inventory::get_history,
        handlers::inventory::manual_adjustment,
        handlers::inventory::register_reception,
        handlers::inventory::list_receptions,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catalogos ---
            models::catalog::Branch,
            models::catalog::CatalogEntry,
            models::catalog::Currency,

            // --- Clientes ---
            models::clients::ClientKind,
            models::clients::Client,
            models::clients::CreateClientPayload,
            models::clients::UpdateClientPayload,

            // --- Productos ---
            models::products::Product,
            models::products::ProductSearchRow,
            models::products::CreateProductPayload,

            // --- Compras ---
            models::purchases::RequestStatus,
            models::purchases::DocumentStatus,
            models::purchases::DocumentKind,
            models::purchases::PurchaseRequest,
            models::purchases::RequestSummary,
            models::purchases::RequestDetails,
            models::purchases::Quotation,
            models::purchases::Provider,
            models::purchases::InvoiceRow,
            models::purchases::InvoiceWithVouchers,
            models::purchases::InvoiceRef,
            models::purchases::Payment,
            models::purchases::InvoiceGroupInput,
            models::purchases::VoucherInput,
            handlers::purchases::ApprovePayload,
            handlers::purchases::RejectPayload,
            handlers::purchases::ReviewPayload,

            // --- Inventario ---
            models::inventory::MovementType,
            models::inventory::MovementConcept,
            models::inventory::InventoryMovement,
            models::inventory::ProductStock,
            models::inventory::StockStatus,
            models::inventory::StockView,
            models::inventory::MovementHistoryRow,
            models::inventory::MovementHistoryPage,
            models::inventory::ReceptionSummary,
            models::inventory::ReceptionItemInput,
            models::inventory::AdjustmentPayload,

            // --- Comuns ---
            crate::common::response::ActionResult,
        )
    ),
    tags(
        (name = "Auth", description = "Login e sessão"),
        (name = "Catalogos", description = "Sucursais, moedas e catálogos mestres"),
        (name = "Clientes", description = "Registro de clientes"),
        (name = "Productos", description = "Catálogo de produtos"),
        (name = "Compras", description = "Fluxo de solicitudes de compra"),
        (name = "Inventario", description = "Estoque, recepções e ajustes"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
