// src/services/customer_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::TimeWindow},
    db::ReportStore,
    models::{
        crm::Customer,
        reports::{CustomerStats, TopCustomerEntry},
    },
};

const TOP_CUSTOMERS: usize = 10;

#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn ReportStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, window: TimeWindow) -> Result<CustomerStats, AppError> {
        let customers = self.store.all_customers().await?;
        let total_customers = customers.len() as i64;

        // Recalcula o gasto real de cada cliente a partir das faturas
        // pagas. O campo cacheado só serve de comparação para o reparo.
        let mut ranked: Vec<TopCustomerEntry> = Vec::with_capacity(customers.len());
        for customer in &customers {
            let true_spent = self.store.customer_true_total_spent(customer.id).await?;
            let job_card_count = self.store.customer_job_card_count(customer.id).await?;

            if true_spent != customer.total_spent {
                self.repair_cached_spend(customer, true_spent).await;
            }

            ranked.push(TopCustomerEntry {
                customer_id: customer.id,
                name: customer.full_name.clone(),
                total_spent: true_spent,
                job_card_count,
            });
        }

        // Ranking por gasto real; quem nunca gastou não entra no top,
        // mesmo com cache dizendo o contrário.
        ranked.retain(|entry| entry.total_spent > Decimal::ZERO);
        ranked.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
        ranked.truncate(TOP_CUSTOMERS);

        let new_customers = customers
            .iter()
            .filter(|c| window.contains(c.created_at.timestamp_millis()))
            .count() as i64;

        let active_customers = self.store.active_customers_in_range(window).await?.len() as i64;

        let retention_rate = if total_customers > 0 {
            active_customers as f64 / total_customers as f64 * 100.0
        } else {
            0.0
        };

        // Denominador proposital: a base inteira de clientes, não só os
        // ranqueados.
        let top_spend_sum: Decimal = ranked.iter().map(|e| e.total_spent).sum();
        let average_customer_value = if total_customers > 0 {
            top_spend_sum / Decimal::from(total_customers)
        } else {
            Decimal::ZERO
        };

        let total_loyalty_points = customers
            .iter()
            .map(|c| i64::from(c.loyalty_points))
            .sum();

        Ok(CustomerStats {
            total_customers,
            new_customers,
            active_customers,
            retention_rate,
            average_customer_value,
            total_loyalty_points,
            top_customers: ranked,
        })
    }

    // Reparo de cache: efeito colateral opcional, separado da leitura.
    // Falha aqui é logada e não derruba o relatório.
    async fn repair_cached_spend(&self, customer: &Customer, true_spent: Decimal) {
        if let Err(err) = self
            .store
            .persist_corrected_customer_spend(customer.id, true_spent)
            .await
        {
            tracing::warn!(
                "Falha ao corrigir total_spent do cliente {}: {}",
                customer.id,
                err
            );
        }
    }

    /// Recalcula e persiste o gasto real de um cliente. Idempotente: rodar
    /// duas vezes seguidas grava o mesmo valor.
    pub async fn recompute_and_persist(&self, customer_id: Uuid) -> Result<Decimal, AppError> {
        let true_spent = self.store.customer_true_total_spent(customer_id).await?;
        self.store
            .persist_corrected_customer_spend(customer_id, true_spent)
            .await?;
        Ok(true_spent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{customer, dec, ts, window, MemStore};
    use std::collections::HashMap;

    fn month_window() -> TimeWindow {
        window(ts(2024, 6, 1, 1), ts(2024, 7, 1, 1))
    }

    #[tokio::test]
    async fn zero_spend_never_reaches_the_top_even_with_stale_cache() {
        // Cache diz 500, faturas dizem zero.
        let stale = customer("Ana", "500", 10, ts(2024, 1, 10, 12));
        let buyer = customer("Bruno", "300", 5, ts(2024, 2, 10, 12));

        let mut true_spend = HashMap::new();
        true_spend.insert(stale.id, Decimal::ZERO);
        true_spend.insert(buyer.id, dec("300"));

        let store = Arc::new(MemStore {
            customers: vec![stale.clone(), buyer.clone()],
            true_spend,
            ..Default::default()
        });
        let service = CustomerService::new(store.clone());

        let stats = service.stats(month_window()).await.unwrap();

        assert_eq!(stats.top_customers.len(), 1);
        assert_eq!(stats.top_customers[0].customer_id, buyer.id);
        assert_eq!(stats.top_customers[0].total_spent, dec("300"));
    }

    #[tokio::test]
    async fn divergent_cache_triggers_a_corrective_write() {
        let stale = customer("Ana", "500", 0, ts(2024, 1, 10, 12));
        let fresh = customer("Bruno", "300", 0, ts(2024, 2, 10, 12));

        let mut true_spend = HashMap::new();
        true_spend.insert(stale.id, dec("120"));
        true_spend.insert(fresh.id, dec("300"));

        let store = Arc::new(MemStore {
            customers: vec![stale.clone(), fresh.clone()],
            true_spend,
            ..Default::default()
        });
        let service = CustomerService::new(store.clone());

        service.stats(month_window()).await.unwrap();

        // Só o cache divergente foi corrigido.
        let corrected = store.corrected.lock().unwrap();
        assert_eq!(*corrected, vec![(stale.id, dec("120"))]);
    }

    #[tokio::test]
    async fn average_value_divides_by_the_whole_customer_base() {
        // Dois clientes, só um gastou: média = 300 / 2, não 300 / 1.
        let buyer = customer("Ana", "300", 0, ts(2024, 1, 10, 12));
        let idle = customer("Bruno", "0", 0, ts(2024, 2, 10, 12));

        let mut true_spend = HashMap::new();
        true_spend.insert(buyer.id, dec("300"));

        let store = Arc::new(MemStore {
            customers: vec![buyer, idle],
            true_spend,
            ..Default::default()
        });
        let service = CustomerService::new(store);

        let stats = service.stats(month_window()).await.unwrap();
        assert_eq!(stats.average_customer_value, dec("150"));
    }

    #[tokio::test]
    async fn counts_retention_and_loyalty() {
        let old = customer("Ana", "0", 120, ts(2023, 3, 10, 12));
        let recent = customer("Bruno", "0", 30, ts(2024, 6, 10, 12));

        let store = Arc::new(MemStore {
            customers: vec![old.clone(), recent.clone()],
            active_customers: vec![recent.clone()],
            ..Default::default()
        });
        let service = CustomerService::new(store);

        let stats = service.stats(month_window()).await.unwrap();

        assert_eq!(stats.total_customers, 2);
        assert_eq!(stats.new_customers, 1);
        assert_eq!(stats.active_customers, 1);
        assert!((stats.retention_rate - 50.0).abs() < 1e-9);
        assert_eq!(stats.total_loyalty_points, 150);
    }

    #[tokio::test]
    async fn empty_base_yields_zeroed_rates() {
        let service = CustomerService::new(Arc::new(MemStore::default()));

        let stats = service.stats(month_window()).await.unwrap();

        assert_eq!(stats.retention_rate, 0.0);
        assert_eq!(stats.average_customer_value, Decimal::ZERO);
        assert!(stats.top_customers.is_empty());
    }

    #[tokio::test]
    async fn recompute_and_persist_is_idempotent() {
        let ana = customer("Ana", "999", 0, ts(2024, 1, 10, 12));

        let mut true_spend = HashMap::new();
        true_spend.insert(ana.id, dec("250"));

        let store = Arc::new(MemStore {
            customers: vec![ana.clone()],
            true_spend,
            ..Default::default()
        });
        let service = CustomerService::new(store.clone());

        let first = service.recompute_and_persist(ana.id).await.unwrap();
        let second = service.recompute_and_persist(ana.id).await.unwrap();

        assert_eq!(first, dec("250"));
        assert_eq!(second, dec("250"));
        let corrected = store.corrected.lock().unwrap();
        assert_eq!(*corrected, vec![(ana.id, dec("250")), (ana.id, dec("250"))]);
    }
}
