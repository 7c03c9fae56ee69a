//! Planets collection endpoint
//!
//! Full (non-paginated) planets collection with each record's resident
//! reference links replaced by resolved display names. Not sortable.

use axum::extract::State;
use axum::Json;

use crate::services::collections;
use crate::AppState;
use orrery_common::api::CollectionResponse;

use super::ApiError;

/// GET /planets
pub async fn get_planets(
    State(state): State<AppState>,
) -> Result<Json<CollectionResponse>, ApiError> {
    let results = collections::load_planets(&state).await?;

    Ok(Json(CollectionResponse {
        count: results.len(),
        results,
    }))
}
