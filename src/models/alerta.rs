use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Producto;

/// Severity of a stock alert, derived purely from `stock_actual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Normal,
    LowStock,
    Critical,
}

impl AlertLevel {
    /// Classify a stock level against the product minimum and the absolute
    /// critical floor. The critical floor wins when both apply.
    pub fn for_stock(stock_actual: i64, stock_minimo: i64, critical_floor: i64) -> Self {
        if stock_actual <= critical_floor {
            AlertLevel::Critical
        } else if stock_actual <= stock_minimo {
            AlertLevel::LowStock
        } else {
            AlertLevel::Normal
        }
    }
}

/// Active alert for one product. At most one exists per product at a time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub producto_id: i64,
    pub nombre: String,
    pub stock_actual: i64,
    pub stock_minimo: i64,
    pub level: AlertLevel,
    pub detectada_en: DateTime<Utc>,
}

impl StockAlert {
    pub fn desde_producto(producto: &Producto, level: AlertLevel) -> Self {
        Self {
            producto_id: producto.id,
            nombre: producto.nombre.clone(),
            stock_actual: producto.stock_actual,
            stock_minimo: producto.stock_minimo,
            level,
            detectada_en: Utc::now(),
        }
    }
}
