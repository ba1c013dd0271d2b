use thiserror::Error;

/// Errors produced by the ledger reconciler and the inventory store.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Producto {id} no encontrado")]
    ProductNotFound { id: i64 },

    #[error("Movimiento {id} no encontrado")]
    MovementNotFound { id: i64 },

    #[error("{0}")]
    ValidationError(String),

    #[error("Stock insuficiente: se solicitaron {requested} unidades pero hay {available} disponibles")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("La edición dejaría la cadena de movimientos inconsistente: {0}")]
    ChainInconsistency(String),
}
