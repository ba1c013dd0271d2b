use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificacionTipo {
    Success,
    Warning,
    Error,
    Info,
}

/// One entry of the local, session-scoped notification feed.
///
/// `success` entries self-expire shortly after publication; the rest live
/// until marked read, cleared, or evicted by the channel capacity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notificacion {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub tipo: NotificacionTipo,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producto_id: Option<i64>,
    pub leida: bool,
    pub timestamp: DateTime<Utc>,
}

impl Notificacion {
    pub fn new(
        tipo: NotificacionTipo,
        title: impl Into<String>,
        message: impl Into<String>,
        producto_id: Option<i64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tipo,
            title: title.into(),
            message: message.into(),
            producto_id,
            leida: false,
            timestamp: Utc::now(),
        }
    }
}
