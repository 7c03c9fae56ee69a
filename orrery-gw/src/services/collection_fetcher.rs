//! Full-collection fetcher
//!
//! Walks every page of a paginated upstream resource and concatenates the
//! results into one ordered collection. Page 1 is fetched first to learn the
//! total count; the remaining pages are fetched concurrently and joined by
//! page index, so completion order never reorders the output.
//!
//! Pages are all-or-nothing: a single failed page fails the whole call and
//! no partial collection is ever returned. (Reference resolution isolates
//! failures instead; see `reference_resolver`.)

use crate::upstream::UpstreamApi;
use futures::future::try_join_all;
use orrery_common::api::Record;
use orrery_common::{Error, Result};
use tracing::{debug, error};

/// Fetch the complete collection for `resource`, in page-then-within-page order
pub async fn fetch_all(
    upstream: &dyn UpstreamApi,
    resource: &str,
    page_size: u32,
) -> Result<Vec<Record>> {
    // Page 1 must succeed: without it the total size is unknown
    let first = upstream.fetch_page(resource, 1).await.map_err(|e| {
        error!(resource = %resource, page = 1, error = %e, "Page fetch failed");
        Error::UpstreamUnavailable(format!("{}: page 1: {}", resource, e))
    })?;

    let total_count = first.count;
    let total_pages = total_count.div_ceil(u64::from(page_size)) as u32;
    debug!(
        resource = %resource,
        total_count,
        total_pages,
        "Fetched first page, fanning out for the rest"
    );

    let mut records = first.results;

    if total_pages > 1 {
        // Unbounded fan-out: the upstream collections are small and bounded.
        // try_join_all keeps page order and drops sibling requests on the
        // first failure.
        let remaining = try_join_all((2..=total_pages).map(|page| async move {
            upstream.fetch_page(resource, page).await.map_err(|e| {
                error!(resource = %resource, page, error = %e, "Page fetch failed");
                Error::UpstreamUnavailable(format!("{}: page {}: {}", resource, page, e))
            })
        }))
        .await?;

        for page in remaining {
            records.extend(page.results);
        }
    }

    Ok(records)
}
