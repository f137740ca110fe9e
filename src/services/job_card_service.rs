// src/services/job_card_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    common::{error::AppError, time::TimeWindow},
    db::ReportStore,
    models::{operations::JobCard, reports::JobCardStats},
};

#[derive(Clone)]
pub struct JobCardService {
    store: Arc<dyn ReportStore>,
}

impl JobCardService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, window: TimeWindow) -> Result<JobCardStats, AppError> {
        let cards = self.store.job_cards_in_range(window).await?;
        Ok(compute(&cards))
    }
}

fn compute(cards: &[JobCard]) -> JobCardStats {
    let mut by_status: HashMap<String, i64> = HashMap::new();
    let mut by_priority: HashMap<String, i64> = HashMap::new();
    let mut by_technician: HashMap<String, i64> = HashMap::new();

    for card in cards {
        *by_status.entry(card.status.as_str().to_string()).or_insert(0) += 1;
        *by_priority
            .entry(card.priority.as_str().to_string())
            .or_insert(0) += 1;

        // Ordens sem técnico atribuído ficam fora do agrupamento por técnico.
        if let Some(name) = &card.technician_name {
            *by_technician.entry(name.clone()).or_insert(0) += 1;
        }
    }

    JobCardStats {
        total_job_cards: cards.len() as i64,
        by_status,
        by_priority,
        by_technician,
        average_completion_hours: average_completion_hours(cards),
    }
}

/// Média de horas até a conclusão. Ordens sem data de conclusão ficam fora
/// da média (não entram como zero); sem nenhuma concluída, a média é 0.0.
pub(crate) fn average_completion_hours(cards: &[JobCard]) -> f64 {
    let durations: Vec<f64> = cards.iter().filter_map(JobCard::completion_hours).collect();
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<f64>() / durations.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{job_card, ts, window, worker, MemStore};
    use crate::models::operations::{JobPriority, JobStatus};

    #[tokio::test]
    async fn groups_by_status_priority_and_technician() {
        let joao = worker("João");
        let store = MemStore {
            job_cards: vec![
                job_card(JobStatus::Pending, JobPriority::High, Some(&joao), ts(2024, 5, 2, 9), None, "0"),
                job_card(JobStatus::Pending, JobPriority::Low, None, ts(2024, 5, 3, 9), None, "0"),
                job_card(
                    JobStatus::Completed,
                    JobPriority::High,
                    Some(&joao),
                    ts(2024, 5, 4, 9),
                    Some(ts(2024, 5, 4, 13)),
                    "250",
                ),
            ],
            ..Default::default()
        };
        let service = JobCardService::new(Arc::new(store));

        let stats = service
            .stats(window(ts(2024, 5, 1, 1), ts(2024, 6, 1, 1)))
            .await
            .unwrap();

        assert_eq!(stats.total_job_cards, 3);
        assert_eq!(stats.by_status.get("PENDING"), Some(&2));
        assert_eq!(stats.by_status.get("COMPLETED"), Some(&1));
        assert_eq!(stats.by_priority.get("HIGH"), Some(&2));
        assert_eq!(stats.by_priority.get("LOW"), Some(&1));

        // A ordem sem técnico não entra no agrupamento por técnico.
        assert_eq!(stats.by_technician.len(), 1);
        assert_eq!(stats.by_technician.get("João"), Some(&2));
    }

    #[tokio::test]
    async fn average_ignores_unfinished_cards() {
        let store = MemStore {
            job_cards: vec![
                // 4 horas de bancada.
                job_card(
                    JobStatus::Completed,
                    JobPriority::Normal,
                    None,
                    ts(2024, 5, 2, 8),
                    Some(ts(2024, 5, 2, 12)),
                    "100",
                ),
                // 2 horas.
                job_card(
                    JobStatus::Delivered,
                    JobPriority::Normal,
                    None,
                    ts(2024, 5, 3, 8),
                    Some(ts(2024, 5, 3, 10)),
                    "100",
                ),
                // Aberta: fora da média, não vale zero.
                job_card(JobStatus::InProgress, JobPriority::Normal, None, ts(2024, 5, 4, 8), None, "0"),
            ],
            ..Default::default()
        };
        let service = JobCardService::new(Arc::new(store));

        let stats = service
            .stats(window(ts(2024, 5, 1, 1), ts(2024, 6, 1, 1)))
            .await
            .unwrap();

        assert!((stats.average_completion_hours - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn average_is_zero_when_nothing_completed() {
        let store = MemStore {
            job_cards: vec![job_card(
                JobStatus::Pending,
                JobPriority::Urgent,
                None,
                ts(2024, 5, 2, 8),
                None,
                "0",
            )],
            ..Default::default()
        };
        let service = JobCardService::new(Arc::new(store));

        let stats = service
            .stats(window(ts(2024, 5, 1, 1), ts(2024, 6, 1, 1)))
            .await
            .unwrap();

        assert_eq!(stats.average_completion_hours, 0.0);
    }
}
