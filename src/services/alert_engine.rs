//! Background stock watcher.
//!
//! Scans the product store on a fixed interval (and once at startup),
//! raises one deduplicated alert per product at or below threshold and
//! clears alerts silently when stock recovers. Scan failures end only that
//! cycle; the next tick retries naturally.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::constants;
use crate::models::{AlertLevel, NotificacionTipo, StockAlert};
use crate::services::notifier::NotificationChannel;
use crate::store::InventoryStore;

pub struct AlertEngine {
    store: Arc<InventoryStore>,
    notifier: NotificationChannel,
    activas: Mutex<HashMap<i64, StockAlert>>,
}

impl AlertEngine {
    pub fn new(store: Arc<InventoryStore>, notifier: NotificationChannel) -> Self {
        Self {
            store,
            notifier,
            activas: Mutex::new(HashMap::new()),
        }
    }

    /// One scan cycle. Returns the alerts raised in this cycle only;
    /// products already under an active alert produce nothing (dedup).
    pub async fn scan(&self) -> Result<Vec<StockAlert>, crate::models::LedgerError> {
        let bajos = self.store.reporte_stock_bajo().await?;
        let ids_bajos: HashSet<i64> = bajos.iter().map(|p| p.id).collect();

        let mut activas = self.activas.lock().await;

        // Stock recovered: clear silently, no notification.
        let antes = activas.len();
        activas.retain(|id, _| ids_bajos.contains(id));
        if activas.len() < antes {
            debug!(resueltas = antes - activas.len(), "Alertas resueltas");
        }

        let mut nuevas = Vec::new();
        for producto in bajos {
            let level = AlertLevel::for_stock(
                producto.stock_actual,
                producto.stock_minimo,
                constants::CRITICAL_STOCK_FLOOR,
            );

            match activas.get_mut(&producto.id) {
                Some(existente) => {
                    // Already alerted: keep the stock snapshot current, but
                    // never notify twice for the same condition.
                    existente.stock_actual = producto.stock_actual;
                    existente.stock_minimo = producto.stock_minimo;
                    if existente.level != level {
                        existente.level = level;
                        existente.detectada_en = Utc::now();
                    }
                }
                None => {
                    let alerta = StockAlert::desde_producto(&producto, level);
                    let (tipo, titulo) = match level {
                        AlertLevel::Critical => (NotificacionTipo::Error, "Stock crítico"),
                        _ => (NotificacionTipo::Warning, "Stock bajo"),
                    };
                    self.notifier
                        .publish(
                            tipo,
                            titulo,
                            format!(
                                "{}: quedan {} unidades (mínimo {})",
                                producto.nombre, producto.stock_actual, producto.stock_minimo
                            ),
                            Some(producto.id),
                        )
                        .await;
                    activas.insert(producto.id, alerta.clone());
                    nuevas.push(alerta);
                }
            }
        }

        Ok(nuevas)
    }

    pub async fn alertas_activas(&self) -> Vec<StockAlert> {
        let mut alertas: Vec<StockAlert> = self.activas.lock().await.values().cloned().collect();
        alertas.sort_by_key(|a| a.producto_id);
        alertas
    }

    /// Explicitly dismiss a product's active alert.
    pub async fn descartar(&self, producto_id: i64) -> bool {
        self.activas.lock().await.remove(&producto_id).is_some()
    }

    /// Run the periodic scan until the token is cancelled. The first tick
    /// fires immediately.
    pub fn spawn(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            info!("🔎 Vigilancia de stock iniciada (cada {}s)", interval.as_secs());

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("🛑 Vigilancia de stock detenida");
                        break;
                    }
                    _ = ticker.tick() => {
                        match engine.scan().await {
                            Ok(nuevas) if !nuevas.is_empty() => {
                                info!("⚠️ {} alertas de stock nuevas", nuevas.len());
                            }
                            Ok(_) => debug!("Escaneo completado sin alertas nuevas"),
                            Err(e) => warn!("Escaneo de stock omitido: {e}"),
                        }
                    }
                }
            }
        })
    }
}
