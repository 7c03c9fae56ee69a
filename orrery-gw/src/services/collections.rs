//! Cache-fronted collection orchestration
//!
//! The load path behind both published endpoints: consult the freshness
//! cache; on a miss, take the per-resource single-flight lock so concurrent
//! cold requests collapse into one upstream fetch+resolve cycle, then
//! materialize the collection and populate the cache.
//!
//! Sorting is deliberately not part of this path: sorted output is produced
//! per request and never cached.

use crate::services::{collection_fetcher, reference_resolver};
use crate::AppState;
use orrery_common::api::Record;
use orrery_common::Result;
use std::time::Duration;
use tracing::{debug, info};

/// Upstream resource name for the people collection
pub const PEOPLE_RESOURCE: &str = "people";

/// Upstream resource name for the planets collection
pub const PLANETS_RESOURCE: &str = "planets";

/// Planet field holding resident reference links
pub const PLANET_LINK_FIELD: &str = "residents";

/// Freshness window for materialized collections
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Load the full people collection (unsorted)
pub async fn load_people(state: &AppState) -> Result<Vec<Record>> {
    load(state, PEOPLE_RESOURCE, None).await
}

/// Load the full planets collection with resident links resolved to names
pub async fn load_planets(state: &AppState) -> Result<Vec<Record>> {
    load(state, PLANETS_RESOURCE, Some(PLANET_LINK_FIELD)).await
}

async fn load(state: &AppState, resource: &str, link_field: Option<&str>) -> Result<Vec<Record>> {
    if let Some(cached) = state.cache.get(resource).await {
        debug!(resource = %resource, count = cached.len(), "Serving from cache");
        return Ok(cached);
    }

    let flight = state.flight(resource).await;
    let _guard = flight.lock().await;

    // A concurrent caller may have populated the cache while we waited
    if let Some(cached) = state.cache.get(resource).await {
        debug!(resource = %resource, "Populated by concurrent request");
        return Ok(cached);
    }

    let mut records =
        collection_fetcher::fetch_all(state.upstream.as_ref(), resource, state.page_size).await?;

    if let Some(field) = link_field {
        reference_resolver::resolve_references(state.upstream.as_ref(), &mut records, field).await;
    }

    state.cache.put(resource, records.clone(), CACHE_TTL).await;
    info!(resource = %resource, count = records.len(), "Materialized collection");

    Ok(records)
}
