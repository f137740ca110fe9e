// src/db/test_support.rs
//
// Implementação em memória da fachada de relatórios, usada pelos testes dos
// calculadores. Permite injetar falhas e atrasos.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::TimeWindow},
    db::ReportStore,
    models::{
        crm::Customer,
        finance::{Invoice, PaymentStatus},
        inventory::InventoryItem,
        operations::{JobCard, JobPriority, JobStatus},
        reports::TopPartEntry,
        workforce::{Worker, WorkerStatus},
    },
};

#[derive(Default)]
pub struct MemStore {
    pub invoices: Vec<Invoice>,
    pub job_cards: Vec<JobCard>,
    pub customers: Vec<Customer>,
    pub active_customers: Vec<Customer>,
    pub true_spend: HashMap<Uuid, Decimal>,
    pub job_card_counts: HashMap<Uuid, i64>,
    pub items: Vec<InventoryItem>,
    pub top_parts: Vec<TopPartEntry>,
    pub workers: Vec<Worker>,

    /// Falha tudo: simula banco fora do ar.
    pub fail_all: bool,
    /// Falha só a consulta de ordens deste técnico.
    pub fail_for_technician: Option<Uuid>,
    /// Atraso artificial antes de cada resposta.
    pub delay: Option<Duration>,

    /// Reparos de cache gravados, na ordem.
    pub corrected: Mutex<Vec<(Uuid, Decimal)>>,
}

impl MemStore {
    async fn guard(&self) -> Result<(), AppError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_all {
            return Err(anyhow!("banco de dados indisponível").into());
        }
        Ok(())
    }
}

#[async_trait]
impl ReportStore for MemStore {
    async fn invoices_in_range(&self, window: TimeWindow) -> Result<Vec<Invoice>, AppError> {
        self.guard().await?;
        Ok(self
            .invoices
            .iter()
            .filter(|i| window.contains(i.invoice_date.timestamp_millis()))
            .cloned()
            .collect())
    }

    async fn job_cards_in_range(&self, window: TimeWindow) -> Result<Vec<JobCard>, AppError> {
        self.guard().await?;
        Ok(self
            .job_cards
            .iter()
            .filter(|jc| window.contains(jc.created_at.timestamp_millis()))
            .cloned()
            .collect())
    }

    async fn all_customers(&self) -> Result<Vec<Customer>, AppError> {
        self.guard().await?;
        Ok(self.customers.clone())
    }

    async fn active_customers_in_range(
        &self,
        _window: TimeWindow,
    ) -> Result<Vec<Customer>, AppError> {
        self.guard().await?;
        Ok(self.active_customers.clone())
    }

    async fn customer_true_total_spent(&self, customer_id: Uuid) -> Result<Decimal, AppError> {
        self.guard().await?;
        Ok(self
            .true_spend
            .get(&customer_id)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn customer_job_card_count(&self, customer_id: Uuid) -> Result<i64, AppError> {
        self.guard().await?;
        Ok(self.job_card_counts.get(&customer_id).copied().unwrap_or(0))
    }

    async fn all_inventory_items(&self) -> Result<Vec<InventoryItem>, AppError> {
        self.guard().await?;
        Ok(self.items.clone())
    }

    async fn top_used_parts(
        &self,
        _window: TimeWindow,
        limit: i64,
    ) -> Result<Vec<TopPartEntry>, AppError> {
        self.guard().await?;
        Ok(self.top_parts.iter().take(limit as usize).cloned().collect())
    }

    async fn active_workers(&self) -> Result<Vec<Worker>, AppError> {
        self.guard().await?;
        Ok(self
            .workers
            .iter()
            .filter(|w| w.status == WorkerStatus::Active)
            .cloned()
            .collect())
    }

    async fn job_cards_for_technician(
        &self,
        worker_id: Uuid,
        window: TimeWindow,
    ) -> Result<Vec<JobCard>, AppError> {
        self.guard().await?;
        if self.fail_for_technician == Some(worker_id) {
            return Err(anyhow!("falha ao carregar as ordens do técnico").into());
        }
        Ok(self
            .job_cards
            .iter()
            .filter(|jc| {
                jc.technician_id == Some(worker_id)
                    && window.contains(jc.created_at.timestamp_millis())
            })
            .cloned()
            .collect())
    }

    async fn persist_corrected_customer_spend(
        &self,
        customer_id: Uuid,
        amount: Decimal,
    ) -> Result<(), AppError> {
        self.guard().await?;
        self.corrected.lock().unwrap().push((customer_id, amount));
        Ok(())
    }
}

// --- Construtores de linhas de teste ---

/// Instante de teste no fuso local (estabiliza o agrupamento por dia),
/// armazenado em UTC como no banco.
pub fn ts(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .earliest()
        .expect("hora de teste válida")
        .with_timezone(&Utc)
}

pub fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeWindow {
    TimeWindow::new(start.timestamp_millis(), end.timestamp_millis()).unwrap()
}

pub fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

pub fn invoice(
    amount: &str,
    status: PaymentStatus,
    paid: &str,
    mode: Option<&str>,
    date: DateTime<Utc>,
) -> Invoice {
    Invoice {
        id: Uuid::new_v4(),
        job_card_id: Uuid::new_v4(),
        customer_id: Uuid::new_v4(),
        total_amount: dec(amount),
        paid_amount: dec(paid),
        pending_amount: dec(amount) - dec(paid),
        payment_status: status,
        payment_mode: mode.map(String::from),
        invoice_date: date,
    }
}

pub fn job_card(
    status: JobStatus,
    priority: JobPriority,
    technician: Option<&Worker>,
    created: DateTime<Utc>,
    completed: Option<DateTime<Utc>>,
    final_amount: &str,
) -> JobCard {
    JobCard {
        id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        technician_id: technician.map(|w| w.id),
        technician_name: technician.map(|w| w.name.clone()),
        status,
        priority,
        created_at: created,
        completion_date: completed,
        final_amount: dec(final_amount),
    }
}

pub fn customer(name: &str, cached_spent: &str, loyalty: i32, created: DateTime<Utc>) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        phone: None,
        total_spent: dec(cached_spent),
        loyalty_points: loyalty,
        created_at: created,
    }
}

pub fn item(name: &str, stock: &str, minimum: &str, price: &str) -> InventoryItem {
    InventoryItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        current_stock: dec(stock),
        minimum_stock: dec(minimum),
        selling_price: dec(price),
        is_active: true,
    }
}

pub fn worker(name: &str) -> Worker {
    Worker {
        id: Uuid::new_v4(),
        name: name.to_string(),
        status: WorkerStatus::Active,
        role: "Mecânico".to_string(),
    }
}
