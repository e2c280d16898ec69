use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{api_error, ApiError};
use crate::models::{SearchQuery, SearchResult};
use crate::AppState;

/// GET /api/search?q=... - Series and movies matching a query
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResult>, ApiError> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            api_error(StatusCode::BAD_REQUEST, "Query parameter 'q' is required")
        })?;

    tracing::debug!("Search: {}", q);
    Ok(Json(state.catalog.search(q).await))
}
