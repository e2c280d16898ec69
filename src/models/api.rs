use serde::Deserialize;

/// Query parameters for paginated listings
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// Query parameters for the episode servers endpoint
#[derive(Debug, Deserialize)]
pub struct EpisodeServersQuery {
    #[serde(default)]
    pub episode_url: Option<String>,
}

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}
