pub mod revenue_service;
pub use revenue_service::RevenueService;
pub mod job_card_service;
pub use job_card_service::JobCardService;
pub mod customer_service;
pub use customer_service::CustomerService;
pub mod inventory_service;
pub use inventory_service::InventoryService;
pub mod workforce_service;
pub use workforce_service::WorkforceService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
