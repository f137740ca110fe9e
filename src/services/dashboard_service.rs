// src/services/dashboard_service.rs

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        time::{dashboard_anchors, TimeWindow},
    },
    models::reports::{DashboardSummary, JobCardStats, Metric},
    services::{CustomerService, InventoryService, JobCardService, RevenueService},
};

// Limite por métrica: estourou, vira falha comum e a métrica entra zerada.
const METRIC_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct DashboardService {
    revenue: RevenueService,
    job_cards: JobCardService,
    customers: CustomerService,
    inventory: InventoryService,
    metric_timeout: Duration,
}

impl DashboardService {
    pub fn new(
        revenue: RevenueService,
        job_cards: JobCardService,
        customers: CustomerService,
        inventory: InventoryService,
    ) -> Self {
        Self {
            revenue,
            job_cards,
            customers,
            inventory,
            metric_timeout: METRIC_TIMEOUT,
        }
    }

    /// Resumo do dashboard. Nunca falha: métrica indisponível entra zerada
    /// no resultado e aparece em degraded_sources.
    pub async fn summary(&self) -> DashboardSummary {
        self.summary_at(Local::now()).await
    }

    pub(crate) async fn summary_at(&self, now: DateTime<Local>) -> DashboardSummary {
        let anchors = dashboard_anchors(now);
        let now_ms = now.timestamp_millis();

        // Janelas meio-abertas. O fim do mês anterior (início do mês - 1ms)
        // equivale a usar o início do mês atual como limite exclusivo.
        let today = TimeWindow {
            start_ms: anchors.today_start_ms,
            end_ms: now_ms,
        };
        let this_month = TimeWindow {
            start_ms: anchors.month_start_ms,
            end_ms: now_ms,
        };
        let last_month = TimeWindow {
            start_ms: anchors.prev_month_start_ms,
            end_ms: anchors.prev_month_end_ms + 1,
        };
        let since_epoch = TimeWindow {
            start_ms: 0,
            end_ms: now_ms,
        };

        // Os calculadores são independentes entre si; uma apuração por
        // refresh basta, então a execução é sequencial mesmo.
        let revenue_today = self.metric("revenueToday", self.revenue.stats(today)).await;
        let revenue_month = self.metric("revenueMonth", self.revenue.stats(this_month)).await;
        let revenue_last_month = self
            .metric("revenueLastMonth", self.revenue.stats(last_month))
            .await;
        let job_cards = self.metric("jobCards", self.job_cards.stats(since_epoch)).await;
        let customers = self.metric("customers", self.customers.stats(this_month)).await;
        let inventory = self.metric("inventory", self.inventory.stats(since_epoch)).await;

        let mut degraded_sources = Vec::new();
        for (name, degraded) in [
            ("revenueToday", revenue_today.is_degraded()),
            ("revenueMonth", revenue_month.is_degraded()),
            ("revenueLastMonth", revenue_last_month.is_degraded()),
            ("jobCards", job_cards.is_degraded()),
            ("customers", customers.is_degraded()),
            ("inventory", inventory.is_degraded()),
        ] {
            if degraded {
                degraded_sources.push(name.to_string());
            }
        }

        let revenue_growth = revenue_growth(
            revenue_month.value().total_revenue,
            revenue_last_month.value().total_revenue,
        );

        DashboardSummary {
            today_revenue: revenue_today.value().total_revenue,
            month_revenue: revenue_month.value().total_revenue,
            pending_invoices: revenue_month.value().unpaid_invoices,
            pending_job_cards: status_count(job_cards.value(), "PENDING"),
            active_job_cards: status_count(job_cards.value(), "IN_PROGRESS"),
            low_stock_items: inventory.value().low_stock + inventory.value().out_of_stock,
            new_customers: customers.value().new_customers,
            revenue_growth,
            degraded_sources,
        }
    }

    async fn metric<T, F>(&self, name: &str, computation: F) -> Metric<T>
    where
        T: Default,
        F: Future<Output = Result<T, AppError>>,
    {
        match tokio::time::timeout(self.metric_timeout, computation).await {
            Ok(Ok(value)) => Metric::Ok(value),
            Ok(Err(err)) => {
                tracing::warn!("Métrica {} degradada: {}", name, err);
                Metric::degraded(err.to_string())
            }
            Err(_) => {
                let err = AppError::MetricTimeout;
                tracing::warn!("Métrica {} degradada: {}", name, err);
                Metric::degraded(err.to_string())
            }
        }
    }
}

fn status_count(stats: &JobCardStats, status: &str) -> i64 {
    stats.by_status.get(status).copied().unwrap_or(0)
}

/// Crescimento da receita mês a mês, em %. Sem base de comparação, qualquer
/// receita conta como 100% de crescimento.
pub(crate) fn revenue_growth(this_month: Decimal, last_month: Decimal) -> f64 {
    if !last_month.is_zero() {
        ((this_month - last_month) / last_month * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0)
    } else if this_month > Decimal::ZERO {
        100.0
    } else {
        0.0
    }
}
