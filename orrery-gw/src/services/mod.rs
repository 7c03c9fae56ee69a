//! Aggregation services
//!
//! The fetch/resolve pipeline behind the published collection endpoints:
//! - `collection_fetcher` — materialize a full upstream collection from pages
//! - `reference_resolver` — replace reference links with display names
//! - `collections` — cache-fronted orchestration of the two

pub mod collection_fetcher;
pub mod collections;
pub mod reference_resolver;
