// src/services/inventory_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, time::TimeWindow},
    db::ReportStore,
    models::{
        inventory::StockStatus,
        reports::{InventoryStats, StockAlert, StockAlertLevel},
    },
};

const TOP_PARTS: i64 = 10;

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn ReportStore>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// O saldo de estoque é sempre "agora"; a janela só delimita o ranking
    /// de peças mais usadas.
    pub async fn stats(&self, window: TimeWindow) -> Result<InventoryStats, AppError> {
        let items = self.store.all_inventory_items().await?;
        let top_used_parts = self.store.top_used_parts(window, TOP_PARTS).await?;

        let mut in_stock = 0i64;
        let mut low_stock = 0i64;
        let mut out_of_stock = 0i64;
        let mut total_inventory_value = Decimal::ZERO;
        let mut stock_alerts = Vec::new();

        for item in &items {
            match item.stock_status() {
                StockStatus::InStock => in_stock += 1,
                StockStatus::LowStock => low_stock += 1,
                StockStatus::OutOfStock => out_of_stock += 1,
            }

            total_inventory_value += item.selling_price * item.current_stock;

            if item.current_stock <= item.minimum_stock {
                stock_alerts.push(StockAlert {
                    item_id: item.id,
                    name: item.name.clone(),
                    current_stock: item.current_stock,
                    minimum_stock: item.minimum_stock,
                    // OUT só quando zerado de fato; o resto é LOW.
                    level: if item.current_stock == Decimal::ZERO {
                        StockAlertLevel::Out
                    } else {
                        StockAlertLevel::Low
                    },
                });
            }
        }

        // Alerta mais crítico primeiro: menor estoque no topo.
        stock_alerts.sort_by(|a, b| a.current_stock.cmp(&b.current_stock));

        Ok(InventoryStats {
            total_items: items.len() as i64,
            in_stock,
            low_stock,
            out_of_stock,
            total_inventory_value,
            top_used_parts,
            stock_alerts,
        })
    }
}
