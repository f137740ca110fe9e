// src/db/facade.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::TimeWindow},
    models::{
        crm::Customer,
        finance::Invoice,
        inventory::InventoryItem,
        operations::JobCard,
        reports::TopPartEntry,
        workforce::Worker,
    },
};

/// Fachada de leitura sobre o banco relacional. É o único ponto de contato
/// dos calculadores de métricas com a persistência — o que permite testá-los
/// contra uma implementação em memória.
///
/// As janelas são meio-abertas [start, end). Leituras concorrentes com os
/// fluxos de escrita são esperadas: o resumo é uma visão de melhor esforço,
/// não um snapshot.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn invoices_in_range(&self, window: TimeWindow) -> Result<Vec<Invoice>, AppError>;

    async fn job_cards_in_range(&self, window: TimeWindow) -> Result<Vec<JobCard>, AppError>;

    async fn all_customers(&self) -> Result<Vec<Customer>, AppError>;

    /// Clientes com pelo menos uma ordem de serviço na janela (join distinto
    /// por veículos e ordens).
    async fn active_customers_in_range(&self, window: TimeWindow)
        -> Result<Vec<Customer>, AppError>;

    /// Gasto real do cliente: soma de paid_amount das faturas PAGAS.
    async fn customer_true_total_spent(&self, customer_id: Uuid) -> Result<Decimal, AppError>;

    /// Ordens de serviço do cliente, via posse dos veículos.
    async fn customer_job_card_count(&self, customer_id: Uuid) -> Result<i64, AppError>;

    /// Itens ativos do catálogo, com saldo de agora.
    async fn all_inventory_items(&self) -> Result<Vec<InventoryItem>, AppError>;

    /// Peças mais usadas na janela, por contagem de uso. Empates ficam na
    /// ordem em que o banco devolver.
    async fn top_used_parts(&self, window: TimeWindow, limit: i64)
        -> Result<Vec<TopPartEntry>, AppError>;

    async fn active_workers(&self) -> Result<Vec<Worker>, AppError>;

    async fn job_cards_for_technician(&self, worker_id: Uuid, window: TimeWindow)
        -> Result<Vec<JobCard>, AppError>;

    /// Reparo do cache customers.total_spent. Idempotente; falha aqui não
    /// derruba a leitura que a originou.
    async fn persist_corrected_customer_spend(&self, customer_id: Uuid, amount: Decimal)
        -> Result<(), AppError>;
}
