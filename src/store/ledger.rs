//! Stock reconciler: the only code path allowed to mutate
//! `Producto.stock_actual`, always atomically with its ledger write.

use chrono::Utc;
use tracing::{debug, info};

use super::InventoryStore;
use crate::models::{
    LedgerError, Movimiento, MovimientoRequest, MovimientoTipo, USUARIO_SISTEMA,
};

fn validar_request(req: &MovimientoRequest) -> Result<(), LedgerError> {
    if req.motivo.trim().is_empty() {
        return Err(LedgerError::ValidationError(
            "El motivo es obligatorio".to_string(),
        ));
    }
    match req.tipo {
        MovimientoTipo::Entrada | MovimientoTipo::Salida if req.cantidad <= 0 => {
            Err(LedgerError::ValidationError(
                "La cantidad debe ser un entero positivo".to_string(),
            ))
        }
        MovimientoTipo::Ajuste if req.cantidad == 0 => Err(LedgerError::ValidationError(
            "Un ajuste debe modificar el stock".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Recompute `stock_anterior`/`stock_posterior` for every movement from
/// `desde` onward, anchored on `anchor` (the previous entry's posterior, or
/// the product baseline). Fails without touching anything if any intermediate
/// stock would go negative; returns the final stock otherwise.
fn replay_cadena(
    movimientos: &mut [Movimiento],
    desde: usize,
    anchor: i64,
) -> Result<i64, LedgerError> {
    let mut stock = anchor;
    // Dry pass first so a failure leaves the chain untouched.
    for m in movimientos[desde..].iter() {
        let posterior = stock
            .checked_add(m.tipo.signed_delta(m.cantidad))
            .ok_or_else(|| {
                LedgerError::ChainInconsistency(format!(
                    "el movimiento {} desborda el stock",
                    m.id
                ))
            })?;
        if posterior < 0 {
            return Err(LedgerError::ChainInconsistency(format!(
                "el movimiento {} dejaría el stock en {posterior}",
                m.id
            )));
        }
        stock = posterior;
    }

    let mut stock = anchor;
    for m in movimientos[desde..].iter_mut() {
        m.stock_anterior = stock;
        m.stock_posterior = stock + m.tipo.signed_delta(m.cantidad);
        stock = m.stock_posterior;
    }
    Ok(stock)
}

impl InventoryStore {
    /// Register a new movement: validate, compute the before/after snapshot,
    /// append to the ledger and update the product stock in one step under
    /// the product lock.
    pub async fn registrar_movimiento(
        &self,
        req: MovimientoRequest,
        usuario: Option<String>,
    ) -> Result<Movimiento, LedgerError> {
        validar_request(&req)?;

        let producto_id = req.producto.id;
        let slot = self
            .slot(producto_id)
            .await
            .ok_or(LedgerError::ProductNotFound { id: producto_id })?;
        let mut guard = slot.lock().await;

        let stock_anterior = guard.producto.stock_actual;
        let delta = req.tipo.signed_delta(req.cantidad);
        let stock_posterior = stock_anterior.checked_add(delta).ok_or_else(|| {
            LedgerError::ValidationError("La cantidad excede el rango permitido".to_string())
        })?;
        if stock_posterior < 0 {
            return Err(LedgerError::InsufficientStock {
                requested: delta.saturating_abs(),
                available: stock_anterior,
            });
        }

        let movimiento = Movimiento {
            id: self.next_movement_id(),
            producto_id,
            tipo: req.tipo,
            cantidad: req.cantidad,
            motivo: req.motivo.trim().to_string(),
            fecha: Utc::now(),
            usuario: usuario.unwrap_or_else(|| USUARIO_SISTEMA.to_string()),
            stock_anterior,
            stock_posterior,
        };

        guard.movimientos.push(movimiento.clone());
        guard.producto.stock_actual = stock_posterior;
        self.indexar_movimiento(movimiento.id, producto_id).await;
        drop(guard);
        info!(
            movimiento_id = movimiento.id,
            producto_id,
            tipo = movimiento.tipo.as_str(),
            stock = stock_posterior,
            "📒 Movimiento registrado"
        );
        Ok(movimiento)
    }

    /// Edit a past movement's kind, quantity or justification, then replay
    /// the chain forward from it. All-or-nothing: if any downstream entry
    /// would go negative the whole edit is rejected and nothing changes.
    pub async fn editar_movimiento(
        &self,
        movimiento_id: i64,
        req: MovimientoRequest,
    ) -> Result<Movimiento, LedgerError> {
        validar_request(&req)?;

        let producto_id = self
            .producto_de_movimiento(movimiento_id)
            .await
            .ok_or(LedgerError::MovementNotFound { id: movimiento_id })?;
        if req.producto.id != producto_id {
            return Err(LedgerError::ValidationError(
                "Un movimiento no puede cambiar de producto".to_string(),
            ));
        }

        let slot = self
            .slot(producto_id)
            .await
            .ok_or(LedgerError::ProductNotFound { id: producto_id })?;
        let mut guard = slot.lock().await;

        let idx = guard
            .movimientos
            .iter()
            .position(|m| m.id == movimiento_id)
            .ok_or(LedgerError::MovementNotFound { id: movimiento_id })?;

        let mut cadena = guard.movimientos.clone();
        cadena[idx].tipo = req.tipo;
        cadena[idx].cantidad = req.cantidad;
        cadena[idx].motivo = req.motivo.trim().to_string();

        let anchor = if idx == 0 {
            guard.baseline
        } else {
            cadena[idx - 1].stock_posterior
        };
        let stock_final = replay_cadena(&mut cadena, idx, anchor)?;

        let editado = cadena[idx].clone();
        guard.movimientos = cadena;
        guard.producto.stock_actual = stock_final;

        info!(
            movimiento_id,
            producto_id,
            stock = stock_final,
            "✏️ Movimiento editado, cadena recalculada"
        );
        Ok(editado)
    }

    /// Retract a movement and replay the rest of the chain as if its delta
    /// had been zero. Same all-or-nothing policy as editing.
    pub async fn eliminar_movimiento(&self, movimiento_id: i64) -> Result<(), LedgerError> {
        let producto_id = self
            .producto_de_movimiento(movimiento_id)
            .await
            .ok_or(LedgerError::MovementNotFound { id: movimiento_id })?;
        let slot = self
            .slot(producto_id)
            .await
            .ok_or(LedgerError::ProductNotFound { id: producto_id })?;
        let mut guard = slot.lock().await;

        let idx = guard
            .movimientos
            .iter()
            .position(|m| m.id == movimiento_id)
            .ok_or(LedgerError::MovementNotFound { id: movimiento_id })?;

        let mut cadena = guard.movimientos.clone();
        let anchor = if idx == 0 {
            guard.baseline
        } else {
            cadena[idx - 1].stock_posterior
        };
        cadena.remove(idx);
        let stock_final = replay_cadena(&mut cadena, idx, anchor)?;

        guard.movimientos = cadena;
        guard.producto.stock_actual = stock_final;
        drop(guard);

        self.desindexar_movimiento(movimiento_id).await;
        info!(
            movimiento_id,
            producto_id,
            stock = stock_final,
            "🗑️ Movimiento eliminado, cadena recalculada"
        );
        Ok(())
    }

    /// Ordered movement history for one product, oldest first.
    pub async fn historial_producto(
        &self,
        producto_id: i64,
    ) -> Result<Vec<Movimiento>, LedgerError> {
        let slot = self
            .slot(producto_id)
            .await
            .ok_or(LedgerError::ProductNotFound { id: producto_id })?;
        let guard = slot.lock().await;
        debug!(producto_id, entradas = guard.movimientos.len(), "Historial consultado");
        Ok(guard.movimientos.clone())
    }
}
