// src/services/workforce_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, time::TimeWindow},
    db::ReportStore,
    models::{reports::WorkerPerformance, workforce::Worker},
    services::job_card_service::average_completion_hours,
};

#[derive(Clone)]
pub struct WorkforceService {
    store: Arc<dyn ReportStore>,
}

impl WorkforceService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Desempenho dos técnicos ativos na janela, do maior faturamento para
    /// o menor.
    pub async fn stats(&self, window: TimeWindow) -> Result<Vec<WorkerPerformance>, AppError> {
        let workers = self.store.active_workers().await?;

        let mut performances = Vec::with_capacity(workers.len());
        for worker in &workers {
            // Falha de um técnico não derruba o lote: entra zerado.
            let performance = match self.worker_stats(worker, window).await {
                Ok(performance) => performance,
                Err(err) => {
                    tracing::warn!(
                        "Falha ao apurar o desempenho do técnico {}: {}",
                        worker.id,
                        err
                    );
                    WorkerPerformance::zeroed(worker)
                }
            };
            performances.push(performance);
        }

        performances.sort_by(|a, b| b.revenue_generated.cmp(&a.revenue_generated));
        Ok(performances)
    }

    async fn worker_stats(
        &self,
        worker: &Worker,
        window: TimeWindow,
    ) -> Result<WorkerPerformance, AppError> {
        let jobs = self.store.job_cards_for_technician(worker.id, window).await?;

        let total_jobs_assigned = jobs.len() as i64;
        let completed_jobs = jobs.iter().filter(|j| j.status.is_finished()).count() as i64;
        // Canceladas não contam nem como concluídas nem como pendentes.
        let pending_jobs = jobs.iter().filter(|j| j.status.is_open()).count() as i64;

        let completion_rate = if total_jobs_assigned > 0 {
            completed_jobs as f64 / total_jobs_assigned as f64 * 100.0
        } else {
            0.0
        };

        let revenue_generated: Decimal = jobs
            .iter()
            .filter(|j| j.status.is_finished())
            .map(|j| j.final_amount)
            .sum();

        Ok(WorkerPerformance {
            worker_id: worker.id,
            name: worker.name.clone(),
            total_jobs_assigned,
            completed_jobs,
            pending_jobs,
            completion_rate,
            average_completion_hours: average_completion_hours(&jobs),
            revenue_generated,
        })
    }
}
