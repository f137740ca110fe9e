// src/handlers/reports.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::TimeWindow},
    config::AppState,
    models::reports::{
        CustomerStats, InventoryStats, JobCardStats, RevenueStats, WorkerPerformance,
    },
};

// Janela dos relatórios em ms de época; sem filtro, vale da época até agora.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl ReportRange {
    fn window(&self) -> Result<TimeWindow, AppError> {
        let default = TimeWindow::since_epoch();
        TimeWindow::new(
            self.start.unwrap_or(default.start_ms),
            self.end.unwrap_or(default.end_ms),
        )
    }
}

// GET /api/reports/revenue
#[utoipa::path(
    get,
    path = "/api/reports/revenue",
    tag = "Relatórios",
    params(ReportRange),
    responses(
        (status = 200, description = "Receita do período", body = RevenueStats),
        (status = 400, description = "Janela de tempo inválida")
    )
)]
pub async fn revenue(
    State(app_state): State<AppState>,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.revenue_service.stats(range.window()?).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/reports/job-cards
#[utoipa::path(
    get,
    path = "/api/reports/job-cards",
    tag = "Relatórios",
    params(ReportRange),
    responses(
        (status = 200, description = "Ordens de serviço do período", body = JobCardStats),
        (status = 400, description = "Janela de tempo inválida")
    )
)]
pub async fn job_cards(
    State(app_state): State<AppState>,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.job_card_service.stats(range.window()?).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/reports/customers
#[utoipa::path(
    get,
    path = "/api/reports/customers",
    tag = "Relatórios",
    params(ReportRange),
    responses(
        (status = 200, description = "Estatísticas de clientes do período", body = CustomerStats),
        (status = 400, description = "Janela de tempo inválida")
    )
)]
pub async fn customers(
    State(app_state): State<AppState>,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.customer_service.stats(range.window()?).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/reports/inventory
#[utoipa::path(
    get,
    path = "/api/reports/inventory",
    tag = "Relatórios",
    params(ReportRange),
    responses(
        (status = 200, description = "Situação do estoque e peças mais usadas", body = InventoryStats),
        (status = 400, description = "Janela de tempo inválida")
    )
)]
pub async fn inventory(
    State(app_state): State<AppState>,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.inventory_service.stats(range.window()?).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/reports/workforce
#[utoipa::path(
    get,
    path = "/api/reports/workforce",
    tag = "Relatórios",
    params(ReportRange),
    responses(
        (status = 200, description = "Desempenho dos técnicos ativos", body = Vec<WorkerPerformance>),
        (status = 400, description = "Janela de tempo inválida")
    )
)]
pub async fn workforce(
    State(app_state): State<AppState>,
    Query(range): Query<ReportRange>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.workforce_service.stats(range.window()?).await?;
    Ok((StatusCode::OK, Json(stats)))
}

// POST /api/crm/customers/{id}/reconcile-spend
#[utoipa::path(
    post,
    path = "/api/crm/customers/{id}/reconcile-spend",
    tag = "CRM",
    params(
        ("id" = Uuid, Path, description = "ID do cliente")
    ),
    responses(
        (status = 200, description = "Gasto real recalculado e persistido"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn reconcile_customer_spend(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let total_spent = app_state.customer_service.recompute_and_persist(id).await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "customerId": id, "totalSpent": total_spent })),
    ))
}
