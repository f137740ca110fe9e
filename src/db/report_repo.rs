// src/db/report_repo.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, time::TimeWindow},
    db::ReportStore,
    models::{
        crm::Customer,
        finance::Invoice,
        inventory::InventoryItem,
        operations::JobCard,
        reports::TopPartEntry,
        workforce::Worker,
    },
};

// Implementação Postgres da fachada de relatórios. Só leitura (mais o reparo
// de cache); o schema é de propriedade do fluxo CRUD.
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for ReportRepository {
    async fn invoices_in_range(&self, window: TimeWindow) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id, job_card_id, customer_id, total_amount, paid_amount,
                pending_amount, payment_status, payment_mode, invoice_date
            FROM invoices
            WHERE invoice_date >= $1 AND invoice_date < $2
            ORDER BY invoice_date ASC
            "#,
        )
        .bind(window.start_utc())
        .bind(window.end_utc())
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    async fn job_cards_in_range(&self, window: TimeWindow) -> Result<Vec<JobCard>, AppError> {
        // LEFT JOIN: o nome do técnico entra direto na linha; ordens sem
        // técnico vêm com NULL.
        let cards = sqlx::query_as::<_, JobCard>(
            r#"
            SELECT
                jc.id, jc.vehicle_id, jc.technician_id,
                w.name AS technician_name,
                jc.status, jc.priority, jc.created_at, jc.completion_date,
                jc.final_amount
            FROM job_cards jc
            LEFT JOIN workers w ON jc.technician_id = w.id
            WHERE jc.created_at >= $1 AND jc.created_at < $2
            ORDER BY jc.created_at ASC
            "#,
        )
        .bind(window.start_utc())
        .bind(window.end_utc())
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    async fn all_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, full_name, phone, total_spent, loyalty_points, created_at
            FROM customers
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn active_customers_in_range(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT DISTINCT
                c.id, c.full_name, c.phone, c.total_spent, c.loyalty_points,
                c.created_at
            FROM customers c
            JOIN vehicles v ON v.customer_id = c.id
            JOIN job_cards jc ON jc.vehicle_id = v.id
            WHERE jc.created_at >= $1 AND jc.created_at < $2
            "#,
        )
        .bind(window.start_utc())
        .bind(window.end_utc())
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn customer_true_total_spent(&self, customer_id: Uuid) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(paid_amount), 0)
            FROM invoices
            WHERE customer_id = $1 AND payment_status = 'PAID'
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn customer_job_card_count(&self, customer_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM job_cards jc
            JOIN vehicles v ON jc.vehicle_id = v.id
            WHERE v.customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn all_inventory_items(&self) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, current_stock, minimum_stock, selling_price, is_active
            FROM inventory_items
            WHERE is_active = TRUE
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn top_used_parts(
        &self,
        window: TimeWindow,
        limit: i64,
    ) -> Result<Vec<TopPartEntry>, AppError> {
        // Empate no uso fica na ordem do banco, de propósito.
        let parts = sqlx::query_as::<_, TopPartEntry>(
            r#"
            SELECT
                p.id AS part_id,
                p.name,
                COUNT(*) AS usage_count,
                COALESCE(SUM(jp.quantity * jp.unit_price), 0) AS total_value
            FROM job_card_parts jp
            JOIN inventory_items p ON jp.item_id = p.id
            JOIN job_cards jc ON jp.job_card_id = jc.id
            WHERE jc.created_at >= $1 AND jc.created_at < $2
            GROUP BY p.id, p.name
            ORDER BY usage_count DESC
            LIMIT $3
            "#,
        )
        .bind(window.start_utc())
        .bind(window.end_utc())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(parts)
    }

    async fn active_workers(&self) -> Result<Vec<Worker>, AppError> {
        let workers = sqlx::query_as::<_, Worker>(
            r#"
            SELECT id, name, status, role
            FROM workers
            WHERE status = 'ACTIVE'
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(workers)
    }

    async fn job_cards_for_technician(
        &self,
        worker_id: Uuid,
        window: TimeWindow,
    ) -> Result<Vec<JobCard>, AppError> {
        let cards = sqlx::query_as::<_, JobCard>(
            r#"
            SELECT
                jc.id, jc.vehicle_id, jc.technician_id,
                w.name AS technician_name,
                jc.status, jc.priority, jc.created_at, jc.completion_date,
                jc.final_amount
            FROM job_cards jc
            JOIN workers w ON jc.technician_id = w.id
            WHERE jc.technician_id = $1
              AND jc.created_at >= $2 AND jc.created_at < $3
            ORDER BY jc.created_at ASC
            "#,
        )
        .bind(worker_id)
        .bind(window.start_utc())
        .bind(window.end_utc())
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    async fn persist_corrected_customer_spend(
        &self,
        customer_id: Uuid,
        amount: Decimal,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET total_spent = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::CustomerNotFound);
        }

        Ok(())
    }
}
