use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use url::Url;

use super::{api_error, found, page_number, ApiError};
use crate::models::{EpisodeServersQuery, PageQuery, SeriesDetail, SeriesSummary, Server};
use crate::AppState;

/// GET /api/series?page=N - One page of the series listing
pub async fn list_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<SeriesSummary>>, ApiError> {
    let page = page_number(query.page)?;
    Ok(Json(state.catalog.series_list(page).await))
}

/// GET /api/series/:series_id - Series with seasons and episodes
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(series_id): Path<String>,
) -> Result<Json<SeriesDetail>, ApiError> {
    let lookup = state.catalog.series_detail(&series_id).await;
    found(lookup, "Series").map(Json)
}

/// GET /api/series/episode/servers?episode_url=URL - Streaming servers of an episode
///
/// Episodes without servers answer an empty list.
pub async fn get_episode_servers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EpisodeServersQuery>,
) -> Result<Json<Vec<Server>>, ApiError> {
    let episode_url = query
        .episode_url
        .as_deref()
        .map(str::trim)
        .filter(|url| is_absolute_http(url))
        .ok_or_else(|| {
            api_error(
                StatusCode::BAD_REQUEST,
                "episode_url must be an absolute http(s) URL",
            )
        })?;

    Ok(Json(state.catalog.episode_servers(episode_url).await))
}

fn is_absolute_http(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}
