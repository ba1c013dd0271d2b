use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use inventario_backend::{build_app, constants, utils::AuthService, AppState, VERSION};

#[tokio::main]
async fn main() {
    // Initialize tracing with environment-based filtering
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "inventario_backend=info,tower_http=warn".to_string()
        } else {
            "inventario_backend=warn,tower_http=error".to_string()
        }
    });

    std::env::set_var("RUST_LOG", &log_level);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("🚀 Starting Inventario Backend v{}", VERSION);

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Server configuration
    let host = std::env::var("SERVER_HOST")
        .unwrap_or_else(|_| constants::DEFAULT_SERVER_HOST.to_string());
    let port = std::env::var("SERVER_PORT")
        .unwrap_or_else(|_| constants::DEFAULT_SERVER_PORT.to_string())
        .parse::<u16>()
        .unwrap_or(constants::DEFAULT_SERVER_PORT);

    let scan_interval = std::env::var("ALERT_SCAN_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(constants::ALERT_SCAN_INTERVAL_SECS);

    info!("Server configured to run on {}:{}", host, port);

    // Initialize authentication service
    let auth_service = AuthService::new().expect("Failed to initialize JWT authentication service");

    let state = AppState::new(auth_service);

    // Load the product catalog if a seed file is configured
    match std::env::var("INVENTORY_SEED_PATH") {
        Ok(path) => {
            if let Err(e) = state.store.load_seed(&path).await {
                warn!("⚠️ No se pudo cargar el catálogo de productos: {e:#}");
            }
        }
        Err(_) => {
            warn!("⚠️ INVENTORY_SEED_PATH no configurado, iniciando sin productos");
        }
    }

    // Start the periodic stock scan (first cycle runs immediately)
    let cancel = CancellationToken::new();
    let scan_handle = state
        .alert_engine
        .spawn(Duration::from_secs(scan_interval), cancel.clone());

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&format!("{host}:{port}"))
        .await
        .expect("Failed to bind to address");

    info!("🎯 Inventario server started successfully on http://{}:{}", host, port);
    info!("🔧 API endpoints available at http://{}:{}/api/", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await
        .expect("Server failed to start");

    if let Err(e) = scan_handle.await {
        warn!("La tarea de vigilancia terminó con error: {e}");
    }
    info!("👋 Inventario backend stopped");
}

/// Wait for Ctrl+C, then stop the background scan before the server drains.
async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
    info!("🛑 Shutdown signal received");
    cancel.cancel();
}
