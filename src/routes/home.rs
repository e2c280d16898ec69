use axum::{extract::State, Json};
use std::sync::Arc;

use crate::models::HomeContent;
use crate::AppState;

/// GET /api/home - Featured and trending content plus latest episodes
///
/// An unreachable source site yields empty sections, not an error.
pub async fn get_home(State(state): State<Arc<AppState>>) -> Json<HomeContent> {
    Json(state.catalog.home().await)
}
