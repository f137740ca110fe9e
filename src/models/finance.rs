// src/models/finance.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,    // Em aberto
    Paid,      // Quitada
    Cancelled, // Cancelada
}

// --- FATURA ---

// 1 ordem de serviço : 0..1 fatura.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub job_card_id: Uuid,
    pub customer_id: Uuid,

    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,

    pub payment_status: PaymentStatus,
    // Forma de pagamento (CASH, CARD, PIX...). Texto livre no banco.
    pub payment_mode: Option<String>,

    pub invoice_date: DateTime<Utc>,
}
