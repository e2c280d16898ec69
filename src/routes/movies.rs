use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use super::{found, page_number, ApiError};
use crate::models::{MovieDetail, MovieSummary, PageQuery};
use crate::AppState;

/// GET /api/movies?page=N - One page of the movie listing
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<MovieSummary>>, ApiError> {
    let page = page_number(query.page)?;
    Ok(Json(state.catalog.movies_list(page).await))
}

/// GET /api/movies/:movie_id - Movie with its streaming servers
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> Result<Json<MovieDetail>, ApiError> {
    let lookup = state.catalog.movie_detail(&movie_id).await;
    found(lookup, "Movie").map(Json)
}
