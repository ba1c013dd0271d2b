use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde_json::json;
use std::collections::HashMap;

use crate::constants;
use crate::models::{LedgerError, Movimiento, MovimientoRequest, NotificacionTipo, Producto};
use crate::types::AuthUser;
use crate::AppState;

/// Inventory routes: products, movement ledger and the low-stock report.
pub fn create_inventario_routes() -> Router<AppState> {
    Router::new()
        .route("/productos", get(list_productos))
        .route(
            "/movimientos-inventario",
            get(list_movimientos).post(registrar_movimiento),
        )
        .route(
            "/movimientos-inventario/{id}",
            put(editar_movimiento).delete(eliminar_movimiento),
        )
        .route(
            "/movimientos-inventario/producto/{id}/historial",
            get(historial_producto),
        )
        .route("/reportes/stock-bajo", get(reporte_stock_bajo))
}

/// GET /api/productos
async fn list_productos(State(state): State<AppState>) -> Json<Vec<Producto>> {
    Json(state.store.list_productos().await)
}

/// GET /api/movimientos-inventario?limit={n}
async fn list_movimientos(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Movimiento>> {
    let limit = params
        .get("limit")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(constants::DEFAULT_MOVEMENT_LIST_LIMIT)
        .min(constants::MAX_MOVEMENT_LIST_LIMIT);

    Json(state.store.list_movimientos(limit).await)
}

/// POST /api/movimientos-inventario
async fn registrar_movimiento(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<MovimientoRequest>,
) -> Result<Json<Movimiento>, (StatusCode, Json<serde_json::Value>)> {
    match state
        .store
        .registrar_movimiento(request, Some(user.username))
        .await
    {
        Ok(movimiento) => {
            state
                .notifier
                .publish(
                    NotificacionTipo::Success,
                    "Movimiento registrado",
                    format!(
                        "{} de {} unidades aplicada, stock actual {}",
                        movimiento.tipo.as_str(),
                        movimiento.cantidad.abs(),
                        movimiento.stock_posterior
                    ),
                    Some(movimiento.producto_id),
                )
                .await;
            Ok(Json(movimiento))
        }
        Err(e) => handle_ledger_error(e),
    }
}

/// PUT /api/movimientos-inventario/{id}
async fn editar_movimiento(
    State(state): State<AppState>,
    Path(movimiento_id): Path<i64>,
    Json(request): Json<MovimientoRequest>,
) -> Result<Json<Movimiento>, (StatusCode, Json<serde_json::Value>)> {
    match state.store.editar_movimiento(movimiento_id, request).await {
        Ok(movimiento) => {
            state
                .notifier
                .publish(
                    NotificacionTipo::Success,
                    "Movimiento actualizado",
                    format!(
                        "Movimiento {} corregido, stock actual {}",
                        movimiento.id, movimiento.stock_posterior
                    ),
                    Some(movimiento.producto_id),
                )
                .await;
            Ok(Json(movimiento))
        }
        Err(e) => handle_ledger_error(e),
    }
}

/// DELETE /api/movimientos-inventario/{id}
async fn eliminar_movimiento(
    State(state): State<AppState>,
    Path(movimiento_id): Path<i64>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.store.eliminar_movimiento(movimiento_id).await {
        Ok(()) => {
            state
                .notifier
                .publish(
                    NotificacionTipo::Success,
                    "Movimiento eliminado",
                    format!("Movimiento {movimiento_id} retirado del historial"),
                    None,
                )
                .await;
            Ok(Json(json!({
                "success": true,
                "message": format!("Movimiento {movimiento_id} eliminado")
            })))
        }
        Err(e) => handle_ledger_error(e),
    }
}

/// GET /api/movimientos-inventario/producto/{id}/historial
async fn historial_producto(
    State(state): State<AppState>,
    Path(producto_id): Path<i64>,
) -> Result<Json<Vec<Movimiento>>, (StatusCode, Json<serde_json::Value>)> {
    match state.store.historial_producto(producto_id).await {
        Ok(historial) => Ok(Json(historial)),
        Err(e) => handle_ledger_error(e),
    }
}

/// GET /api/reportes/stock-bajo
async fn reporte_stock_bajo(
    State(state): State<AppState>,
) -> Result<Json<Vec<Producto>>, (StatusCode, Json<serde_json::Value>)> {
    match state.store.reporte_stock_bajo().await {
        Ok(productos) => Ok(Json(productos)),
        Err(e) => handle_ledger_error(e),
    }
}

fn handle_ledger_error<T>(
    error: LedgerError,
) -> Result<T, (StatusCode, Json<serde_json::Value>)> {
    match error {
        LedgerError::ProductNotFound { id } => Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Producto no encontrado",
                "message": format!("El producto {id} no existe")
            })),
        )),
        LedgerError::MovementNotFound { id } => Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Movimiento no encontrado",
                "message": format!("El movimiento {id} no existe")
            })),
        )),
        LedgerError::ValidationError(msg) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Error de validación",
                "message": msg
            })),
        )),
        LedgerError::InsufficientStock {
            requested,
            available,
        } => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Stock insuficiente",
                "message": format!("Se solicitaron {requested} unidades pero hay {available} disponibles"),
                "requested": requested,
                "available": available
            })),
        )),
        LedgerError::ChainInconsistency(msg) => Err((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Cadena inconsistente",
                "message": msg
            })),
        )),
    }
}
