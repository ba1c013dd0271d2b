use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use uuid::Uuid;

use crate::models::Notificacion;
use crate::types::ApiResponse;
use crate::AppState;

/// Routes over the local notification feed.
pub fn create_notificaciones_routes() -> Router<AppState> {
    Router::new()
        .route("/notificaciones", get(list_notificaciones))
        .route("/notificaciones/{id}/marcar-leida", post(marcar_leida))
        .route("/notificaciones/{id}", delete(clear_notificacion))
}

/// GET /api/notificaciones
async fn list_notificaciones(State(state): State<AppState>) -> Json<Vec<Notificacion>> {
    Json(state.notifier.list().await)
}

/// POST /api/notificaciones/{id}/marcar-leida
async fn marcar_leida(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, (StatusCode, Json<ApiResponse<bool>>)> {
    if state.notifier.marcar_leida(id).await {
        Ok(Json(ApiResponse::success(true, "Notificación marcada como leída")))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Notificación no encontrada")),
        ))
    }
}

/// DELETE /api/notificaciones/{id}
async fn clear_notificacion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, (StatusCode, Json<ApiResponse<bool>>)> {
    if state.notifier.clear(id).await {
        Ok(Json(ApiResponse::success(true, "Notificación eliminada")))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Notificación no encontrada")),
        ))
    }
}
