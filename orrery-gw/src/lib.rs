//! orrery-gw library - Registry aggregation gateway
//!
//! Aggregates a paginated upstream registry of people and planets into two
//! flattened, cross-referenced collection endpoints.

use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod api;
pub mod cache;
pub mod services;
pub mod sort;
pub mod upstream;

use cache::FreshnessCache;
use upstream::UpstreamApi;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream registry client
    pub upstream: Arc<dyn UpstreamApi>,
    /// Freshness cache for materialized collections
    pub cache: Arc<FreshnessCache>,
    /// Upstream page size (fixed by configuration, not discovered)
    pub page_size: u32,
    /// Per-resource single-flight locks for cache misses
    flights: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl AppState {
    /// Create new application state
    pub fn new(upstream: Arc<dyn UpstreamApi>, cache: Arc<FreshnessCache>, page_size: u32) -> Self {
        Self {
            upstream,
            cache,
            page_size,
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Single-flight lock for one resource's cache-miss path
    pub(crate) async fn flight(&self, resource: &str) -> Arc<Mutex<()>> {
        self.flights
            .lock()
            .await
            .entry(resource.to_string())
            .or_default()
            .clone()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/people", get(api::get_people))
        .route("/planets", get(api::get_planets))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
