// src/models/reports.rs
//
// Registros produzidos pelos calculadores de métricas e pelo agregador do
// dashboard. Todos planos e serializáveis: a camada de apresentação só lê.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::workforce::Worker;

// --- 1. Receita ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenueEntry {
    /// Data no formato YYYY-MM-DD (calendário local).
    pub date: String,
    pub revenue: Decimal,
    pub invoice_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    pub total_revenue: Decimal,
    /// Soma dos valores recebidos (só faturas PAGAS).
    pub paid_amount: Decimal,
    /// Soma dos valores das faturas em aberto.
    pub pending_amount: Decimal,

    pub total_invoices: i64,
    pub paid_invoices: i64,
    pub unpaid_invoices: i64,

    /// total_revenue / total_invoices; zero sem faturas.
    pub average_invoice_value: Decimal,

    /// Quebra por dia, ordenada ascendentemente pela data.
    pub daily_revenue: Vec<DailyRevenueEntry>,

    /// Valores pagos por forma de pagamento (só faturas pagas e com forma
    /// registrada).
    pub payment_mode_breakdown: HashMap<String, Decimal>,
}

// --- 2. Ordens de Serviço ---

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCardStats {
    pub total_job_cards: i64,

    pub by_status: HashMap<String, i64>,
    pub by_priority: HashMap<String, i64>,
    /// Contagem por técnico responsável; ordens sem técnico ficam de fora.
    pub by_technician: HashMap<String, i64>,

    /// Média de horas até a conclusão, só sobre ordens concluídas.
    pub average_completion_hours: f64,
}

// --- 3. Clientes ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomerEntry {
    pub customer_id: Uuid,
    pub name: String,
    /// Gasto real, recalculado a partir das faturas pagas (não o cache).
    pub total_spent: Decimal,
    pub job_card_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total_customers: i64,
    /// Clientes cadastrados dentro da janela.
    pub new_customers: i64,
    /// Clientes com pelo menos uma ordem de serviço na janela.
    pub active_customers: i64,

    /// active / total x 100; zero sem clientes.
    pub retention_rate: f64,
    /// Soma do gasto dos top clientes / total de clientes da base.
    pub average_customer_value: Decimal,

    pub total_loyalty_points: i64,

    /// Top 10 por gasto real, excluindo quem nunca gastou.
    pub top_customers: Vec<TopCustomerEntry>,
}

// --- 4. Estoque ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockAlertLevel {
    Low,
    Out,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub item_id: Uuid,
    pub name: String,
    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
    pub level: StockAlertLevel,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopPartEntry {
    pub part_id: Uuid,
    pub name: String,
    pub usage_count: i64,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: i64,
    pub in_stock: i64,
    pub low_stock: i64,
    pub out_of_stock: i64,

    /// Σ preço de venda x estoque atual, sobre todos os itens ativos.
    pub total_inventory_value: Decimal,

    /// Peças mais usadas dentro da janela (o resto é sempre "agora").
    pub top_used_parts: Vec<TopPartEntry>,

    /// Itens no mínimo ou abaixo, do menor estoque para o maior.
    pub stock_alerts: Vec<StockAlert>,
}

// --- 5. Desempenho dos técnicos ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPerformance {
    pub worker_id: Uuid,
    pub name: String,

    pub total_jobs_assigned: i64,
    /// COMPLETED ou DELIVERED.
    pub completed_jobs: i64,
    /// PENDING ou IN_PROGRESS. Canceladas não contam em nenhum dos dois.
    pub pending_jobs: i64,

    /// completed / total x 100; zero sem ordens.
    pub completion_rate: f64,
    pub average_completion_hours: f64,

    /// Σ final_amount das ordens finalizadas.
    pub revenue_generated: Decimal,
}

impl WorkerPerformance {
    /// Registro zerado usado quando a apuração de um técnico falha: o lote
    /// continua em vez de abortar.
    pub fn zeroed(worker: &Worker) -> Self {
        Self {
            worker_id: worker.id,
            name: worker.name.clone(),
            total_jobs_assigned: 0,
            completed_jobs: 0,
            pending_jobs: 0,
            completion_rate: 0.0,
            average_completion_hours: 0.0,
            revenue_generated: Decimal::ZERO,
        }
    }
}

// --- 6. Dashboard ---

/// Resultado de uma métrica do dashboard: ou o valor calculado, ou o
/// fallback zerado com a causa registrada. Distingue "zero de verdade" de
/// "falhou e virou zero".
#[derive(Debug, Clone)]
pub enum Metric<T> {
    Ok(T),
    Degraded { fallback: T, cause: String },
}

impl<T: Default> Metric<T> {
    pub fn degraded(cause: impl Into<String>) -> Self {
        Metric::Degraded {
            fallback: T::default(),
            cause: cause.into(),
        }
    }
}

impl<T> Metric<T> {
    pub fn value(&self) -> &T {
        match self {
            Metric::Ok(value) => value,
            Metric::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Metric::Degraded { .. })
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            Metric::Ok(_) => None,
            Metric::Degraded { cause, .. } => Some(cause),
        }
    }
}

// Os cards do topo da tela inicial.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today_revenue: Decimal,
    pub month_revenue: Decimal,

    /// Faturas em aberto do mês corrente.
    pub pending_invoices: i64,

    pub pending_job_cards: i64,
    pub active_job_cards: i64,

    /// Itens baixos + zerados.
    pub low_stock_items: i64,

    pub new_customers: i64,

    /// Crescimento mês a mês, em %.
    pub revenue_growth: f64,

    /// Métricas que falharam e entraram zeradas no resumo.
    pub degraded_sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_metric_keeps_fallback_and_cause() {
        let metric: Metric<RevenueStats> = Metric::degraded("banco fora do ar");

        assert!(metric.is_degraded());
        assert_eq!(metric.cause(), Some("banco fora do ar"));
        assert_eq!(metric.value().total_invoices, 0);

        let ok = Metric::Ok(RevenueStats::default());
        assert!(!ok.is_degraded());
        assert_eq!(ok.cause(), None);
    }
}
