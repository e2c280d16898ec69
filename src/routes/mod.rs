pub mod health;
pub mod home;
pub mod movies;
pub mod search;
pub mod series;

use axum::{http::StatusCode, Json};

use crate::services::scraper::Lookup;

/// Error returned by every API handler
pub type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(serde_json::json!({ "error": message })))
}

/// Validate a 1-based listing page number
pub fn page_number(page: i64) -> Result<u32, ApiError> {
    u32::try_from(page)
        .ok()
        .filter(|page| *page >= 1)
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "page must be a positive integer"))
}

/// Map a detail lookup to the response or a 404/502 error
pub fn found<T>(lookup: Lookup<T>, what: &str) -> Result<T, ApiError> {
    match lookup {
        Lookup::Found(value) => Ok(value),
        Lookup::NotFound => Err(api_error(
            StatusCode::NOT_FOUND,
            &format!("{} not found", what),
        )),
        Lookup::Unavailable => Err(api_error(
            StatusCode::BAD_GATEWAY,
            "Source site unavailable",
        )),
    }
}
