//! Cross-reference resolver
//!
//! Replaces the reference links embedded in a record field with resolved
//! display names. Distinct links are looked up exactly once (the same entity
//! is commonly referenced by multiple parents), lookups run concurrently, and
//! failures are isolated per link: reference data is enrichment, so a failed
//! lookup degrades to the `"Unknown"` sentinel instead of failing the
//! enclosing request.
//!
//! Internally an unresolved link is `None`; the sentinel is rendered only at
//! the point the record is rewritten.

use crate::upstream::UpstreamApi;
use futures::future::join_all;
use orrery_common::api::Record;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Sentinel rendered for links that could not be resolved
pub const UNKNOWN: &str = "Unknown";

/// Field holding the display name in a referenced record
const NAME_FIELD: &str = "name";

/// Rewrite each record's `link_field` with resolved display names, in
/// original order and multiplicity. Never fails; unresolvable links become
/// [`UNKNOWN`].
pub async fn resolve_references(
    upstream: &dyn UpstreamApi,
    records: &mut [Record],
    link_field: &str,
) {
    // Distinct link tokens across all records, first-seen order
    let mut seen = HashSet::new();
    let mut tokens: Vec<String> = Vec::new();
    for record in records.iter() {
        if let Some(Value::Array(links)) = record.get(link_field) {
            for link in links {
                if let Some(token) = link.as_str() {
                    if seen.insert(token.to_string()) {
                        tokens.push(token.to_string());
                    }
                }
            }
        }
    }

    if tokens.is_empty() {
        return;
    }
    debug!(
        field = %link_field,
        distinct = tokens.len(),
        "Resolving references"
    );

    // One concurrent lookup per distinct token, failures isolated per link
    let lookups = tokens.iter().map(|token| async move {
        match upstream.fetch_record(token).await {
            Ok(record) => {
                let name = record
                    .get(NAME_FIELD)
                    .and_then(|v| v.as_str())
                    .map(str::to_string);
                if name.is_none() {
                    warn!(link = %token, "Referenced record has no name field");
                }
                name
            }
            Err(e) => {
                warn!(link = %token, error = %e, "Reference lookup failed");
                None
            }
        }
    });
    let resolved: Vec<Option<String>> = join_all(lookups).await;

    let names: HashMap<String, Option<String>> = tokens.into_iter().zip(resolved).collect();

    // 1:1 in-place rewrite; list length and order never change
    for record in records.iter_mut() {
        if let Some(Value::Array(links)) = record.get_mut(link_field) {
            for link in links.iter_mut() {
                let display = match link.as_str() {
                    Some(token) => names
                        .get(token)
                        .and_then(|name| name.clone())
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                    None => continue,
                };
                *link = Value::String(display);
            }
        }
    }
}
