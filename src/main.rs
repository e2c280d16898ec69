mod config;
mod models;
mod routes;
mod services;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{fetcher::HttpFetcher, scraper::Catalog};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub start_time: Instant,
}

/// Build the HTTP router over a prepared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/live", get(routes::health::live))
        // Catalog endpoints
        .route("/api/home", get(routes::home::get_home))
        .route("/api/series", get(routes::series::list_series))
        .route(
            "/api/series/episode/servers",
            get(routes::series::get_episode_servers),
        )
        .route("/api/series/:series_id", get(routes::series::get_series))
        .route("/api/movies", get(routes::movies::list_movies))
        .route("/api/movies/:movie_id", get(routes::movies::get_movie))
        .route("/api/search", get(routes::search::search))
        // Middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .with_state(state)
}

/// Turn a handler panic into a JSON 500 instead of a dropped connection
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    routes::api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seriesflix_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Starting SeriesFlix Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Source site: {}", config.base_url);

    // Initialize the upstream client and the catalog on top of it
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let catalog = Catalog::new(fetcher, config.base_url.clone());
    tracing::info!(
        "HTTP fetcher initialized (timeout {}ms, {} redirects)",
        config.fetch_timeout_ms,
        config.max_redirects
    );

    // Build application state
    let state = Arc::new(AppState {
        config,
        catalog,
        start_time: Instant::now(),
    });

    let app = build_router(state);

    // Start server
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
