//! Service-facing API types shared between handlers and tests

use serde::Serialize;

/// A registry record: an open-ended field mapping, kept exactly as the
/// upstream returns it except for designated reference fields.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Response envelope for the published collection endpoints
#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    /// Total number of records (the full, non-paginated collection)
    pub count: usize,
    pub results: Vec<Record>,
}

/// JSON body for error responses
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
