use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Janela de tempo inválida")]
    InvalidTimeWindow,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    // Uma métrica estourou o limite de tempo. Tratado como falha comum:
    // nunca chega ao caller do dashboard, vira métrica degradada.
    #[error("Tempo limite excedido ao calcular a métrica")]
    MetricTimeout,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidTimeWindow => (
                StatusCode::BAD_REQUEST,
                "O início da janela deve ser anterior ao fim.",
            ),
            AppError::CustomerNotFound => (StatusCode::NOT_FOUND, "Cliente não encontrado."),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
