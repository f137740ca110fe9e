// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{ReportRepository, ReportStore},
    services::{
        CustomerService, DashboardService, InventoryService, JobCardService, RevenueService,
        WorkforceService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub revenue_service: RevenueService,
    pub job_card_service: JobCardService,
    pub customer_service: CustomerService,
    pub inventory_service: InventoryService,
    pub workforce_service: WorkforceService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, quem decide
    // o que fazer é o main.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let store: Arc<dyn ReportStore> = Arc::new(ReportRepository::new(db_pool.clone()));

        let revenue_service = RevenueService::new(store.clone());
        let job_card_service = JobCardService::new(store.clone());
        let customer_service = CustomerService::new(store.clone());
        let inventory_service = InventoryService::new(store.clone());
        let workforce_service = WorkforceService::new(store.clone());
        let dashboard_service = DashboardService::new(
            revenue_service.clone(),
            job_card_service.clone(),
            customer_service.clone(),
            inventory_service.clone(),
        );

        Ok(Self {
            db_pool,
            revenue_service,
            job_card_service,
            customer_service,
            inventory_service,
            workforce_service,
            dashboard_service,
        })
    }
}
