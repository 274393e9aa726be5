pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use state::AppState;

/// Build the HTTP router over shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Orders
        .route("/order", post(handlers::create_order))
        .route("/orders", get(handlers::list_orders))
        .route("/orders/{order_id}", get(handlers::get_order))
        .route("/orders/{order_id}/status", post(handlers::update_status))
        .route("/orders/{order_id}/print", post(handlers::print_order))
        // System
        .route("/health", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .with_state(state)
}

/// How long shutdown waits for pending mails and receipts
const SIDE_EFFECT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Start HTTP Gateway server; returns after Ctrl-C once pending side effects
/// have finished or the drain timeout elapsed
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.port
        )
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state
        .orders
        .drain_side_effects(SIDE_EFFECT_DRAIN_TIMEOUT)
        .await;
    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
