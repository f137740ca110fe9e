//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // O schema é de propriedade do fluxo CRUD; aqui só lemos, então não há
    // migração a rodar na subida.

    let dashboard_routes = Router::new().route("/summary", get(handlers::dashboard::get_summary));

    let report_routes = Router::new()
        .route("/revenue", get(handlers::reports::revenue))
        .route("/job-cards", get(handlers::reports::job_cards))
        .route("/customers", get(handlers::reports::customers))
        .route("/inventory", get(handlers::reports::inventory))
        .route("/workforce", get(handlers::reports::workforce));

    let crm_routes = Router::new().route(
        "/customers/{id}/reconcile-spend",
        post(handlers::reports::reconcile_customer_spend),
    );

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/reports", report_routes)
        .nest("/api/crm", crm_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
