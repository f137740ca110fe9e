// src/models/operations.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    // Entrega exige conclusão anterior; quem garante a transição é o fluxo
    // de escrita, fora deste núcleo de leitura.
    Delivered,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
            JobStatus::Delivered => "DELIVERED",
        }
    }

    /// Finalizada para fins de desempenho: concluída ou já entregue.
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Delivered)
    }

    /// Ainda na fila ou em bancada.
    pub fn is_open(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl JobPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::Low => "LOW",
            JobPriority::Normal => "NORMAL",
            JobPriority::High => "HIGH",
            JobPriority::Urgent => "URGENT",
        }
    }
}

// --- ORDEM DE SERVIÇO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub id: Uuid,
    pub vehicle_id: Uuid,

    pub technician_id: Option<Uuid>,
    // Preenchido por LEFT JOIN com workers na consulta.
    pub technician_name: Option<String>,

    pub status: JobStatus,
    pub priority: JobPriority,

    pub created_at: DateTime<Utc>,
    pub completion_date: Option<DateTime<Utc>>,

    pub final_amount: Decimal,
}

impl JobCard {
    /// Duração até a conclusão, em horas. None enquanto não concluída —
    /// ordens abertas ficam fora das médias, não entram como zero.
    pub fn completion_hours(&self) -> Option<f64> {
        self.completion_date.map(|done| {
            (done.timestamp_millis() - self.created_at.timestamp_millis()) as f64 / 3_600_000.0
        })
    }
}
