// src/models/inventory.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Classificação derivada de saúde do estoque ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

// --- ITEM DE ESTOQUE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,

    pub current_stock: Decimal,
    pub minimum_stock: Decimal,
    pub selling_price: Decimal,

    pub is_active: bool,
}

impl InventoryItem {
    /// Classificação total e mutuamente exclusiva: zerado (ou negativo)
    /// é OUT_OF_STOCK, no mínimo ou abaixo é LOW_STOCK, o resto IN_STOCK.
    pub fn stock_status(&self) -> StockStatus {
        if self.current_stock <= Decimal::ZERO {
            StockStatus::OutOfStock
        } else if self.current_stock <= self.minimum_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(stock: &str, minimum: &str) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            name: "Filtro de óleo".to_string(),
            current_stock: stock.parse().unwrap(),
            minimum_stock: minimum.parse().unwrap(),
            selling_price: "10".parse().unwrap(),
            is_active: true,
        }
    }

    #[test]
    fn status_covers_every_item_exactly_once() {
        assert_eq!(item("0", "5").stock_status(), StockStatus::OutOfStock);
        assert_eq!(item("-2", "5").stock_status(), StockStatus::OutOfStock);
        assert_eq!(item("3", "5").stock_status(), StockStatus::LowStock);
        assert_eq!(item("5", "5").stock_status(), StockStatus::LowStock);
        assert_eq!(item("6", "5").stock_status(), StockStatus::InStock);
    }
}
