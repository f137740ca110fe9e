// src/models/crm.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,

    pub full_name: String,
    pub phone: Option<String>,

    // Valor derivado e CACHEADO. A fonte da verdade é a soma das faturas
    // pagas do cliente; os relatórios recalculam e corrigem este campo
    // quando divergir.
    pub total_spent: Decimal,

    pub loyalty_points: i32,

    pub created_at: DateTime<Utc>,
}

// Os veículos (1 cliente : N veículos) existem só no nível relacional.
// Os relatórios nunca materializam um veículo: as consultas da fachada
// atravessam customers -> vehicles -> job_cards direto no SQL.
