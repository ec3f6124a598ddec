//! Event Forms API - Main Entry Point

use event_forms::InMemoryFormStore;
use event_forms_api::{build_router, ApiState, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Event Forms API v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "/etc/eventforms/api.json".into());

    let config = ServerConfig::load(&config_path)
        .unwrap_or_else(|e| {
            tracing::warn!(path = %config_path, error = %e, "Config not loaded, using defaults");
            ServerConfig::default()
        })
        .with_env();

    let store = Arc::new(InMemoryFormStore::new());
    let app = build_router(ApiState::new(store), &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
