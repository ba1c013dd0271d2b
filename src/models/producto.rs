use serde::{Deserialize, Serialize};

/// Product master record. `stock_actual` is the single source of truth for
/// current stock and is only ever written by the ledger reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    pub id: i64,
    pub nombre: String,
    pub precio: f64,
    pub stock_actual: i64,
    pub stock_minimo: i64,
}

impl Producto {
    /// A product is low on stock when it sits at or below its own minimum,
    /// or at or below the absolute critical floor.
    pub fn bajo_stock(&self, critical_floor: i64) -> bool {
        self.stock_actual <= self.stock_minimo || self.stock_actual <= critical_floor
    }
}
