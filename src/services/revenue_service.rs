// src/services/revenue_service.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Local;
use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, time::TimeWindow},
    db::ReportStore,
    models::{
        finance::{Invoice, PaymentStatus},
        reports::{DailyRevenueEntry, RevenueStats},
    },
};

#[derive(Clone)]
pub struct RevenueService {
    store: Arc<dyn ReportStore>,
}

impl RevenueService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Receita da janela: função pura do conjunto de faturas no período.
    /// Ou o registro sai completo, ou a chamada falha.
    pub async fn stats(&self, window: TimeWindow) -> Result<RevenueStats, AppError> {
        let invoices = self.store.invoices_in_range(window).await?;
        Ok(compute(&invoices))
    }
}

// Agregação em memória sobre as faturas já buscadas.
fn compute(invoices: &[Invoice]) -> RevenueStats {
    let total_invoices = invoices.len() as i64;
    let total_revenue: Decimal = invoices.iter().map(|i| i.total_amount).sum();

    let paid_amount: Decimal = invoices
        .iter()
        .filter(|i| i.payment_status == PaymentStatus::Paid)
        .map(|i| i.paid_amount)
        .sum();

    let pending_amount: Decimal = invoices
        .iter()
        .filter(|i| i.payment_status == PaymentStatus::Unpaid)
        .map(|i| i.total_amount)
        .sum();

    let paid_invoices = invoices
        .iter()
        .filter(|i| i.payment_status == PaymentStatus::Paid)
        .count() as i64;
    let unpaid_invoices = invoices
        .iter()
        .filter(|i| i.payment_status == PaymentStatus::Unpaid)
        .count() as i64;

    let average_invoice_value = if total_invoices > 0 {
        total_revenue / Decimal::from(total_invoices)
    } else {
        Decimal::ZERO
    };

    // Quebra diária. O BTreeMap já deixa as chaves YYYY-MM-DD em ordem
    // ascendente.
    let mut daily: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    for invoice in invoices {
        let day = invoice
            .invoice_date
            .with_timezone(&Local)
            .format("%Y-%m-%d")
            .to_string();
        let entry = daily.entry(day).or_insert((Decimal::ZERO, 0));
        entry.0 += invoice.total_amount;
        entry.1 += 1;
    }
    let daily_revenue = daily
        .into_iter()
        .map(|(date, (revenue, invoice_count))| DailyRevenueEntry {
            date,
            revenue,
            invoice_count,
        })
        .collect();

    // Formas de pagamento: só faturas pagas e com forma registrada.
    let mut payment_mode_breakdown: HashMap<String, Decimal> = HashMap::new();
    for invoice in invoices {
        if invoice.payment_status != PaymentStatus::Paid {
            continue;
        }
        if let Some(mode) = &invoice.payment_mode {
            *payment_mode_breakdown
                .entry(mode.clone())
                .or_insert(Decimal::ZERO) += invoice.paid_amount;
        }
    }

    RevenueStats {
        total_revenue,
        paid_amount,
        pending_amount,
        total_invoices,
        paid_invoices,
        unpaid_invoices,
        average_invoice_value,
        daily_revenue,
        payment_mode_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{dec, invoice, ts, window, MemStore};

    #[tokio::test]
    async fn january_window_example() {
        // Duas faturas de janeiro: uma paga em dinheiro, uma em aberto.
        let store = MemStore {
            invoices: vec![
                invoice("100", PaymentStatus::Paid, "100", Some("CASH"), ts(2024, 1, 5, 12)),
                invoice("200", PaymentStatus::Unpaid, "0", None, ts(2024, 1, 10, 12)),
            ],
            ..Default::default()
        };
        let service = RevenueService::new(Arc::new(store));

        let stats = service
            .stats(window(ts(2024, 1, 1, 1), ts(2024, 1, 31, 1)))
            .await
            .unwrap();

        assert_eq!(stats.total_revenue, dec("300"));
        assert_eq!(stats.paid_amount, dec("100"));
        assert_eq!(stats.pending_amount, dec("200"));
        assert_eq!(stats.total_invoices, 2);
        assert_eq!(stats.paid_invoices, 1);
        assert_eq!(stats.unpaid_invoices, 1);
        assert_eq!(stats.average_invoice_value, dec("150"));

        assert_eq!(stats.daily_revenue.len(), 2);
        assert!(stats.daily_revenue[0].date < stats.daily_revenue[1].date);
        assert_eq!(stats.daily_revenue[0].revenue, dec("100"));
        assert_eq!(stats.daily_revenue[0].invoice_count, 1);
        assert_eq!(stats.daily_revenue[1].revenue, dec("200"));

        assert_eq!(stats.payment_mode_breakdown.len(), 1);
        assert_eq!(stats.payment_mode_breakdown.get("CASH"), Some(&dec("100")));
    }

    #[tokio::test]
    async fn daily_breakdown_reconciles_with_totals() {
        let store = MemStore {
            invoices: vec![
                invoice("50", PaymentStatus::Paid, "50", Some("PIX"), ts(2024, 2, 3, 9)),
                invoice("70", PaymentStatus::Paid, "70", Some("CARD"), ts(2024, 2, 3, 15)),
                invoice("30", PaymentStatus::Unpaid, "0", None, ts(2024, 2, 7, 10)),
                invoice("90", PaymentStatus::Cancelled, "0", None, ts(2024, 2, 9, 10)),
            ],
            ..Default::default()
        };
        let service = RevenueService::new(Arc::new(store));

        let stats = service
            .stats(window(ts(2024, 2, 1, 1), ts(2024, 3, 1, 1)))
            .await
            .unwrap();

        let daily_total: Decimal = stats.daily_revenue.iter().map(|d| d.revenue).sum();
        let daily_count: i64 = stats.daily_revenue.iter().map(|d| d.invoice_count).sum();
        assert_eq!(daily_total, stats.total_revenue);
        assert_eq!(daily_count, stats.total_invoices);

        // Cancelada entra no total, mas não em pagas nem em abertas.
        assert_eq!(stats.total_invoices, 4);
        assert_eq!(stats.paid_invoices, 2);
        assert_eq!(stats.unpaid_invoices, 1);
        assert_eq!(stats.pending_amount, dec("30"));
    }

    #[tokio::test]
    async fn empty_window_yields_zeros() {
        let service = RevenueService::new(Arc::new(MemStore::default()));

        let stats = service
            .stats(window(ts(2024, 1, 1, 1), ts(2024, 2, 1, 1)))
            .await
            .unwrap();

        assert_eq!(stats.total_revenue, Decimal::ZERO);
        assert_eq!(stats.average_invoice_value, Decimal::ZERO);
        assert!(stats.daily_revenue.is_empty());
        assert!(stats.payment_mode_breakdown.is_empty());
    }

    #[tokio::test]
    async fn invoices_outside_the_window_are_ignored() {
        let store = MemStore {
            invoices: vec![
                invoice("100", PaymentStatus::Paid, "100", Some("CASH"), ts(2024, 1, 5, 12)),
                invoice("500", PaymentStatus::Paid, "500", Some("CASH"), ts(2024, 3, 5, 12)),
            ],
            ..Default::default()
        };
        let service = RevenueService::new(Arc::new(store));

        let stats = service
            .stats(window(ts(2024, 1, 1, 1), ts(2024, 2, 1, 1)))
            .await
            .unwrap();

        assert_eq!(stats.total_invoices, 1);
        assert_eq!(stats.total_revenue, dec("100"));
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = MemStore {
            fail_all: true,
            ..Default::default()
        };
        let service = RevenueService::new(Arc::new(store));

        let result = service.stats(window(ts(2024, 1, 1, 1), ts(2024, 2, 1, 1))).await;
        assert!(result.is_err());
    }
}
