//! People collection endpoint
//!
//! Full (non-paginated) people collection, sorted per request. Sort
//! parameters are validated against the allow-lists before any upstream
//! work happens; sorted output is never cached.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::services::collections;
use crate::sort::{sort_records, SortField, SortOrder};
use crate::AppState;
use orrery_common::api::CollectionResponse;

use super::ApiError;

/// Query parameters for the people endpoint
#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    #[serde(rename = "sortBy", default = "default_sort_by")]
    pub sort_by: String,

    #[serde(rename = "sortOrder", default = "default_sort_order")]
    pub sort_order: String,
}

fn default_sort_by() -> String {
    "name".to_string()
}

fn default_sort_order() -> String {
    "asc".to_string()
}

/// GET /people?sortBy={name|height|mass}&sortOrder={asc|desc}
pub async fn get_people(
    State(state): State<AppState>,
    Query(query): Query<PeopleQuery>,
) -> Result<Json<CollectionResponse>, ApiError> {
    // Validation happens before any I/O
    let field = SortField::parse(&query.sort_by)
        .ok_or_else(|| ApiError::InvalidParameter(format!("Invalid sortBy: {}", query.sort_by)))?;
    let order = SortOrder::parse(&query.sort_order).ok_or_else(|| {
        ApiError::InvalidParameter(format!("Invalid sortOrder: {}", query.sort_order))
    })?;

    let records = collections::load_people(&state).await?;
    let results = sort_records(&records, field, order);

    Ok(Json(CollectionResponse {
        count: results.len(),
        results,
    }))
}
