//! compliance-engine server.
//!
//! Reads config from env vars:
//!   COMPLIANCE_CATALOG_DIR: rule catalog directory (default: ./config/catalog)
//!   COMPLIANCE_PORT: listen port (default: 8080)
//!   RUST_LOG: tracing filter (default: info)

use std::net::SocketAddr;

use anyhow::Context;
use compliance_engine::api::{AppState, create_router};
use compliance_engine::config::ConfigLoader;
use tokio::net::TcpListener;

const DEFAULT_CATALOG_DIR: &str = "./config/catalog";
const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let catalog_dir =
        std::env::var("COMPLIANCE_CATALOG_DIR").unwrap_or_else(|_| DEFAULT_CATALOG_DIR.into());
    let port = match std::env::var("COMPLIANCE_PORT") {
        Ok(value) => value
            .parse::<u16>()
            .with_context(|| format!("COMPLIANCE_PORT is not a valid port: {}", value))?,
        Err(_) => DEFAULT_PORT,
    };

    let loader = ConfigLoader::load(&catalog_dir)
        .with_context(|| format!("failed to load rule catalog from {}", catalog_dir))?;
    let state = AppState::new(loader.into_catalog());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(%addr, catalog_dir = %catalog_dir, "compliance-engine listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
