//! Local, session-scoped notification feed.
//!
//! Bounded, newest-first, independent of the durable per-user notification
//! store served by the backoffice. Success toasts self-expire; everything
//! else stays until read, cleared or evicted by capacity.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::constants;
use crate::models::{Notificacion, NotificacionTipo};

#[derive(Clone)]
pub struct NotificationChannel {
    inner: Arc<Mutex<VecDeque<Notificacion>>>,
    cap: usize,
    success_ttl: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::with_config(
            constants::NOTIFICATION_CAP,
            Duration::from_secs(constants::SUCCESS_NOTIFICATION_TTL_SECS),
        )
    }

    pub fn with_config(cap: usize, success_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
            cap,
            success_ttl,
        }
    }

    /// Publish a notification. Oldest entries beyond the channel capacity are
    /// evicted; `success` entries are removed again after their TTL.
    pub async fn publish(
        &self,
        tipo: NotificacionTipo,
        title: impl Into<String>,
        message: impl Into<String>,
        producto_id: Option<i64>,
    ) -> Notificacion {
        let notificacion = Notificacion::new(tipo, title, message, producto_id);
        {
            let mut feed = self.inner.lock().await;
            feed.push_front(notificacion.clone());
            while feed.len() > self.cap {
                feed.pop_back();
            }
        }

        if tipo == NotificacionTipo::Success {
            let inner = Arc::clone(&self.inner);
            let id = notificacion.id;
            let ttl = self.success_ttl;
            tokio::spawn(async move {
                tokio::time::sleep(ttl).await;
                let mut feed = inner.lock().await;
                if feed.iter().any(|n| n.id == id) {
                    feed.retain(|n| n.id != id);
                    debug!(%id, "Notificación de éxito expirada");
                }
            });
        }

        notificacion
    }

    /// Current feed contents, newest first.
    pub async fn list(&self) -> Vec<Notificacion> {
        self.inner.lock().await.iter().cloned().collect()
    }

    pub async fn marcar_leida(&self, id: Uuid) -> bool {
        let mut feed = self.inner.lock().await;
        match feed.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.leida = true;
                true
            }
            None => false,
        }
    }

    pub async fn clear(&self, id: Uuid) -> bool {
        let mut feed = self.inner.lock().await;
        let antes = feed.len();
        feed.retain(|n| n.id != id);
        feed.len() < antes
    }
}
