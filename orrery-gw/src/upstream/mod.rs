//! Upstream registry client
//!
//! Narrow contract over the external paginated registry:
//! - `GET <base>/<resource>/?page=<n>` returns one page envelope
//! - `GET <link>` returns a single record (used for reference resolution)
//!
//! The trait seam exists so the aggregation services can be exercised
//! against a fake upstream in tests.

pub mod http;

pub use http::HttpUpstream;

use orrery_common::api::Record;
use serde::Deserialize;
use thiserror::Error;

/// Upstream client errors
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// One page of a paginated upstream collection.
///
/// Consumed immediately after the page request; never retained.
#[derive(Debug, Deserialize)]
pub struct PageEnvelope {
    /// Total item count across all pages of the resource
    pub count: u64,
    /// Records on this page, in upstream order
    pub results: Vec<Record>,
    /// Next-page indicator (unused: page boundaries are computed from count)
    #[serde(default)]
    pub next: Option<String>,
}

/// Narrow upstream contract consumed by the aggregation services
#[async_trait::async_trait]
pub trait UpstreamApi: Send + Sync {
    /// Fetch one page of a paginated collection
    async fn fetch_page(&self, resource: &str, page: u32) -> Result<PageEnvelope, UpstreamError>;

    /// Fetch a single record by its reference link
    async fn fetch_record(&self, link: &str) -> Result<Record, UpstreamError>;
}
