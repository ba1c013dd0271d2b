use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::constants;
use crate::models::{LedgerError, Movimiento, Producto};

pub mod ledger;

/// Per-product state guarded by its own mutex. All writes to a product's
/// stock and movement chain happen with this lock held, which serializes
/// concurrent ledger operations on the same product while leaving other
/// products free to proceed in parallel.
pub(crate) struct ProductoSlot {
    pub producto: Producto,
    /// Stock the product had before its first movement was recorded.
    pub baseline: i64,
    /// Movement chain ordered by (fecha, id).
    pub movimientos: Vec<Movimiento>,
}

/// In-process product store and movement ledger.
pub struct InventoryStore {
    productos: RwLock<HashMap<i64, Arc<Mutex<ProductoSlot>>>>,
    /// movement id -> owning product id
    movimiento_index: RwLock<HashMap<i64, i64>>,
    next_movement_id: AtomicI64,
}

impl Default for InventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryStore {
    pub fn new() -> Self {
        Self {
            productos: RwLock::new(HashMap::new()),
            movimiento_index: RwLock::new(HashMap::new()),
            next_movement_id: AtomicI64::new(1),
        }
    }

    /// Register a product with an empty movement chain. The stock it carries
    /// at insertion becomes the baseline the chain is anchored on.
    pub async fn insertar_producto(&self, producto: Producto) {
        let mut productos = self.productos.write().await;
        if productos.contains_key(&producto.id) {
            warn!("Producto {} ya existe, reemplazando", producto.id);
        }
        let baseline = producto.stock_actual;
        productos.insert(
            producto.id,
            Arc::new(Mutex::new(ProductoSlot {
                producto,
                baseline,
                movimientos: Vec::new(),
            })),
        );
    }

    pub async fn get_producto(&self, id: i64) -> Option<Producto> {
        let slot = self.slot(id).await?;
        let guard = slot.lock().await;
        Some(guard.producto.clone())
    }

    pub async fn list_productos(&self) -> Vec<Producto> {
        let slots: Vec<_> = self.productos.read().await.values().cloned().collect();
        let mut result = Vec::with_capacity(slots.len());
        for slot in slots {
            result.push(slot.lock().await.producto.clone());
        }
        result.sort_by_key(|p| p.id);
        result
    }

    /// Products at or below their alert threshold, for the stock report and
    /// the alert engine scan.
    pub async fn reporte_stock_bajo(&self) -> Result<Vec<Producto>, LedgerError> {
        let mut bajos: Vec<Producto> = self
            .list_productos()
            .await
            .into_iter()
            .filter(|p| p.bajo_stock(constants::CRITICAL_STOCK_FLOOR))
            .collect();
        bajos.sort_by_key(|p| p.stock_actual);
        Ok(bajos)
    }

    /// Most recent movements across all products, newest first.
    pub async fn list_movimientos(&self, limit: usize) -> Vec<Movimiento> {
        let slots: Vec<_> = self.productos.read().await.values().cloned().collect();
        let mut movimientos = Vec::new();
        for slot in slots {
            movimientos.extend(slot.lock().await.movimientos.iter().cloned());
        }
        movimientos.sort_by(|a, b| (b.fecha, b.id).cmp(&(a.fecha, a.id)));
        movimientos.truncate(limit);
        movimientos
    }

    /// Load products from a JSON seed file. Product management itself lives
    /// outside this service, so this is how a standalone instance gets its
    /// catalog.
    pub async fn load_seed(&self, path: &str) -> Result<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("No se pudo leer el archivo de productos: {path}"))?;
        let productos: Vec<Producto> = serde_json::from_str(&raw)
            .with_context(|| format!("Archivo de productos inválido: {path}"))?;

        let count = productos.len();
        for producto in productos {
            self.insertar_producto(producto).await;
        }
        info!("📦 {} productos cargados desde {}", count, path);
        Ok(count)
    }

    pub(crate) async fn slot(&self, id: i64) -> Option<Arc<Mutex<ProductoSlot>>> {
        self.productos.read().await.get(&id).cloned()
    }

    pub(crate) async fn producto_de_movimiento(&self, movimiento_id: i64) -> Option<i64> {
        self.movimiento_index.read().await.get(&movimiento_id).copied()
    }

    pub(crate) async fn indexar_movimiento(&self, movimiento_id: i64, producto_id: i64) {
        self.movimiento_index
            .write()
            .await
            .insert(movimiento_id, producto_id);
    }

    pub(crate) async fn desindexar_movimiento(&self, movimiento_id: i64) {
        self.movimiento_index.write().await.remove(&movimiento_id);
    }

    pub(crate) fn next_movement_id(&self) -> i64 {
        self.next_movement_id.fetch_add(1, Ordering::Relaxed)
    }
}
