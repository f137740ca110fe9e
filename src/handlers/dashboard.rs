// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{config::AppState, models::reports::DashboardSummary};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo financeiro e operacional da oficina", body = DashboardSummary)
    )
)]
pub async fn get_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    // Nunca falha: métrica indisponível entra zerada no resumo e aparece
    // em degradedSources.
    let summary = app_state.dashboard_service.summary().await;
    (StatusCode::OK, Json(summary))
}
