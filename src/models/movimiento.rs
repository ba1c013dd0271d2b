use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor recorded on movements created without an authenticated user.
pub const USUARIO_SISTEMA: &str = "Sistema";

/// Closed set of movement kinds. `cantidad` is unsigned for entries and
/// exits; adjustments carry an already-signed delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovimientoTipo {
    Entrada,
    Salida,
    Ajuste,
}

impl MovimientoTipo {
    /// Signed stock delta this movement applies.
    pub fn signed_delta(&self, cantidad: i64) -> i64 {
        match self {
            MovimientoTipo::Entrada => cantidad,
            MovimientoTipo::Salida => -cantidad,
            MovimientoTipo::Ajuste => cantidad,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovimientoTipo::Entrada => "ENTRADA",
            MovimientoTipo::Salida => "SALIDA",
            MovimientoTipo::Ajuste => "AJUSTE",
        }
    }
}

/// One immutable ledger entry with its before/after stock snapshot.
///
/// Entries are ordered by (`fecha`, `id`) and chain per product:
/// each entry's `stock_anterior` equals the previous entry's
/// `stock_posterior`, or the product baseline for the first entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movimiento {
    pub id: i64,
    pub producto_id: i64,
    pub tipo: MovimientoTipo,
    pub cantidad: i64,
    pub motivo: String,
    pub fecha: DateTime<Utc>,
    pub usuario: String,
    pub stock_anterior: i64,
    pub stock_posterior: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductoRef {
    pub id: i64,
}

/// Request body for registering or editing a movement.
/// POST/PUT /api/movimientos-inventario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovimientoRequest {
    pub producto: ProductoRef,
    pub tipo: MovimientoTipo,
    pub cantidad: i64,
    pub motivo: String,
}
