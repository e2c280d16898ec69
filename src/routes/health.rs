use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// Root endpoint - service info and endpoint index
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "SeriesFlix Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "home": "/api/home",
            "series": "/api/series?page=1",
            "seriesDetail": "/api/series/{series_id}",
            "episodeServers": "/api/series/episode/servers?episode_url={url}",
            "movies": "/api/movies?page=1",
            "movieDetail": "/api/movies/{movie_id}",
            "search": "/api/search?q={query}"
        }
    }))
}

/// Health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    uptime: u64,
    version: String,
    source: String,
    fetch_timeout_ms: u64,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: state.catalog.base_url().to_string(),
        fetch_timeout_ms: state.config.fetch_timeout_ms,
    })
}

/// GET /metrics - Prometheus metrics
pub async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                b"Internal Server Error".to_vec(),
            )
        }
    }
}

/// Liveness probe (for Kubernetes)
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}
