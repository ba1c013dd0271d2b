use std::sync::Arc;

use axum::{
    http::{header, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod constants;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
pub mod types;
pub mod utils;

use middleware::auth::jwt_auth_middleware;
use services::{AlertEngine, NotificationChannel};
use store::InventoryStore;
use utils::AuthService;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InventoryStore>,
    pub notifier: NotificationChannel,
    pub alert_engine: Arc<AlertEngine>,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(auth_service: AuthService) -> Self {
        let store = Arc::new(InventoryStore::new());
        let notifier = NotificationChannel::new();
        let alert_engine = Arc::new(AlertEngine::new(store.clone(), notifier.clone()));
        Self {
            store,
            notifier,
            alert_engine,
            auth_service,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub message: String,
    pub timestamp: String,
    pub version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "healthy".to_string(),
        message: "Inventario backend is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: VERSION.to_string(),
    })
}

/// Assemble the full application router. Everything under `/api` except the
/// health check requires a bearer token.
pub fn build_app(state: AppState) -> Router {
    let api = handlers::inventario::create_inventario_routes()
        .merge(handlers::notificaciones::create_notificaciones_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
