//! Upstream page fetching
//!
//! The scraper core only ever sees [`PageFetcher`]; [`HttpFetcher`] is the
//! reqwest implementation used in production.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::{redirect, Client};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::services::metrics;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Why a page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("failed to read body: {0}")]
    Body(String),
}

impl FetchError {
    /// The upstream answered, and the page does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status(404) | FetchError::Status(410))
    }

    fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::Network(_) => "network",
            FetchError::Status(404) | FetchError::Status(410) => "not_found",
            FetchError::Status(_) => "status",
            FetchError::Body(_) => "body",
        }
    }
}

/// Source of raw HTML documents
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a page and return its body
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;

    /// POST an urlencoded form (player AJAX endpoints) and return the body
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        referer: &str,
    ) -> Result<String, FetchError>;
}

pub type SharedFetcher = Arc<dyn PageFetcher>;

/// reqwest-backed fetcher with browser-like headers and a bounded timeout
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)?,
        );

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .gzip(true)
            .build()?;

        Ok(Self { http })
    }

    async fn read_body(response: reqwest::Response) -> Result<String, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

fn map_send_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(err.to_string())
    }
}

fn record(url: &str, result: &Result<String, FetchError>) {
    match result {
        Ok(body) => debug!("Fetched {} ({} bytes)", url, body.len()),
        Err(e) => {
            metrics::record_fetch_failure(e.kind());
            warn!("Error fetching {}: {}", url, e);
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let result = match self.http.get(url).send().await {
            Ok(response) => Self::read_body(response).await,
            Err(e) => Err(map_send_error(e)),
        };

        record(url, &result);
        result
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        referer: &str,
    ) -> Result<String, FetchError> {
        let result = match self
            .http
            .post(url)
            .header(REFERER, referer)
            .header(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded; charset=UTF-8",
            )
            .form(form)
            .send()
            .await
        {
            Ok(response) => Self::read_body(response).await,
            Err(e) => Err(map_send_error(e)),
        };

        record(url, &result);
        result
    }
}
