//src/main.rs

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use erp_pyme_backend::{
    config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new().await;

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let catalog_routes = Router::new()
        .route("/sucursales", get(handlers::catalog::list_branches))
        .route("/monedas", get(handlers::catalog::list_currencies))
        .route("/{category}", get(handlers::catalog::list_catalog))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::create_client).get(handlers::clients::list_clients),
        )
        .route(
            "/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route("/buscar", get(handlers::products::search_products))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O fluxo de compras inteiro, da solicitud à validação final
    let purchase_routes = Router::new()
        .route(
            "/solicitudes",
            get(handlers::purchases::list_requests).post(handlers::purchases::create_request),
        )
        .route(
            "/solicitudes/{id}",
            get(handlers::purchases::get_request).put(handlers::purchases::update_request),
        )
        .route(
            "/solicitudes/{id}/aprobar",
            post(handlers::purchases::approve_request),
        )
        .route(
            "/solicitudes/{id}/rechazar",
            post(handlers::purchases::reject_request),
        )
        .route(
            "/solicitudes/{id}/ejecucion",
            get(handlers::purchases::get_execution).post(handlers::purchases::register_execution),
        )
        .route(
            "/solicitudes/{id}/completar",
            post(handlers::purchases::complete_request),
        )
        .route(
            "/solicitudes/{id}/facturas",
            get(handlers::purchases::list_invoice_refs),
        )
        .route(
            "/solicitudes/{id}/recepcion",
            post(handlers::inventory::register_reception),
        )
        .route(
            "/solicitudes/{id}/recepciones",
            get(handlers::inventory::list_receptions),
        )
        .route(
            "/solicitudes/{id}/validar",
            post(handlers::purchases::close_request),
        )
        .route(
            "/documentos/{kind}/{id}/revisar",
            post(handlers::purchases::review_document),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let inventory_routes = Router::new()
        .route("/stock", get(handlers::inventory::get_stock))
        .route("/historial", get(handlers::inventory::get_history))
        .route("/ajuste", post(handlers::inventory::manual_adjustment))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/catalogos", catalog_routes)
        .nest("/api/clientes", client_routes)
        .nest("/api/productos", product_routes)
        .nest("/api/compras", purchase_routes)
        .nest("/api/inventario", inventory_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
