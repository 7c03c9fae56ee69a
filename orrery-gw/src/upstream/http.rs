//! reqwest-backed upstream client

use super::{PageEnvelope, UpstreamApi, UpstreamError};
use orrery_common::api::Record;
use std::time::Duration;

const USER_AGENT: &str = concat!("orrery-gw/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout. The upstream publishes no latency bound; without
/// this, a hung upstream call would stall the enclosing request forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the upstream registry
pub struct HttpUpstream {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpUpstream {
    /// Create a client for the given base URL (no trailing slash)
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamError> {
        tracing::debug!(url = %url, "Querying upstream registry");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl UpstreamApi for HttpUpstream {
    async fn fetch_page(&self, resource: &str, page: u32) -> Result<PageEnvelope, UpstreamError> {
        let url = format!("{}/{}/?page={}", self.base_url, resource, page);
        self.get_json(&url).await
    }

    async fn fetch_record(&self, link: &str) -> Result<Record, UpstreamError> {
        self.get_json(link).await
    }
}
