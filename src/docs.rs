// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Relatórios ---
        handlers::reports::revenue,
        handlers::reports::job_cards,
        handlers::reports::customers,
        handlers::reports::inventory,
        handlers::reports::workforce,

        // --- CRM ---
        handlers::reports::reconcile_customer_spend,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::reports::DashboardSummary,

            // --- Receita ---
            models::reports::RevenueStats,
            models::reports::DailyRevenueEntry,

            // --- Ordens de Serviço ---
            models::reports::JobCardStats,

            // --- Clientes ---
            models::reports::CustomerStats,
            models::reports::TopCustomerEntry,

            // --- Estoque ---
            models::reports::InventoryStats,
            models::reports::TopPartEntry,
            models::reports::StockAlert,
            models::reports::StockAlertLevel,
            models::inventory::StockStatus,

            // --- Técnicos ---
            models::reports::WorkerPerformance,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores gerenciais da oficina"),
        (name = "Relatórios", description = "Relatórios por período (janela em ms de época)"),
        (name = "CRM", description = "Operações de clientes")
    )
)]
pub struct ApiDoc;
