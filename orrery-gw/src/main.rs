//! orrery-gw - Registry aggregation gateway
//!
//! Serves two flattened views over a paginated upstream registry:
//! - /people - full collection, sortable by name/height/mass
//! - /planets - full collection with resident links resolved to names

use anyhow::{Context, Result};
use clap::Parser;
use orrery_common::config::{Args, Config};
use orrery_gw::cache::FreshnessCache;
use orrery_gw::upstream::HttpUpstream;
use orrery_gw::{build_router, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting orrery-gw v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::resolve(&args)?;
    info!(
        upstream = %config.upstream_base,
        page_size = config.page_size,
        "Resolved configuration"
    );

    let upstream = HttpUpstream::new(&config.upstream_base)
        .context("Failed to create upstream client")?;
    let cache = FreshnessCache::system();

    // Create application state and router
    let state = AppState::new(Arc::new(upstream), Arc::new(cache), config.page_size);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("orrery-gw listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
