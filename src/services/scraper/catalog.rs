//! Page-kind orchestrators
//!
//! Each operation fetches one page kind (trying candidate URL shapes in order,
//! one at a time), runs the matching cascades and extractors, and returns owned
//! records. Parsed documents never outlive the synchronous `parse_*` helpers,
//! so every future returned here is `Send`.
//!
//! An unreachable page yields an empty listing; detail lookups distinguish
//! [`Lookup::NotFound`] from [`Lookup::Unavailable`].

use tracing::{debug, info, warn};

use super::classify::{classify, ContentKind};
use super::dom::Document;
use super::extract::{
    dedup_servers, extract_cards, extract_detail_fields, extract_recent_episode, extract_server,
    inline_script_servers, player_url_from_response, Extraction, ServerDraft, ServerSource,
    SkipReason,
};
use super::hierarchy::{merge_seasons, plan_seasons, season_page_episodes, SeasonLink, SeasonPlan};
use super::normalize::identifier_from_url;
use super::selectors::*;
use super::urls;
use crate::models::{
    Episode, HomeContent, MovieDetail, MovieSummary, RecentEpisode, SearchResult, Season,
    SeriesDetail, SeriesSummary, Server,
};
use crate::services::fetcher::SharedFetcher;

pub const HOME_FEATURED_LIMIT: usize = 10;
pub const HOME_TRENDING_SERIES_LIMIT: usize = 20;
pub const HOME_TRENDING_MOVIES_LIMIT: usize = 20;
pub const HOME_RECENT_EPISODES_LIMIT: usize = 15;

/// Outcome of a detail lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    /// Every candidate URL answered 404/410
    NotFound,
    /// No candidate produced a page and at least one failed in transport
    Unavailable,
}

/// Result of trying a list of candidate URLs
enum Fetched {
    Page { url: String, body: String },
    NotFound,
    Unavailable,
}

/// Entry point for every catalog operation
#[derive(Clone)]
pub struct Catalog {
    fetcher: SharedFetcher,
    base_url: String,
}

impl Catalog {
    pub fn new(fetcher: SharedFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Try `candidates` sequentially, stopping at the first usable page
    async fn fetch_first(&self, candidates: &[String]) -> Fetched {
        let mut transport_failure = false;

        for url in candidates {
            match self.fetcher.fetch_page(url).await {
                Ok(body) if !body.trim().is_empty() => {
                    return Fetched::Page {
                        url: url.clone(),
                        body,
                    };
                }
                Ok(_) => {
                    debug!("Empty document at {}", url);
                    transport_failure = true;
                }
                Err(e) if e.is_not_found() => debug!("No page at {}", url),
                Err(e) => {
                    debug!("Candidate {} failed: {}", url, e);
                    transport_failure = true;
                }
            }
        }

        if transport_failure {
            Fetched::Unavailable
        } else {
            Fetched::NotFound
        }
    }

    /// Page body for a listing, `None` when no candidate produced one
    async fn fetch_listing(&self, candidates: &[String]) -> Option<String> {
        match self.fetch_first(candidates).await {
            Fetched::Page { body, .. } => Some(body),
            Fetched::NotFound | Fetched::Unavailable => None,
        }
    }

    // ============ HOME ============

    pub async fn home(&self) -> HomeContent {
        match self.fetch_listing(&urls::home(&self.base_url)).await {
            Some(body) => parse_home(&body, &self.base_url),
            None => HomeContent::default(),
        }
    }

    // ============ SERIES ============

    /// One page (1-based) of the series listing
    pub async fn series_list(&self, page: u32) -> Vec<SeriesSummary> {
        let candidates = urls::series_list(&self.base_url, page);
        match self.fetch_listing(&candidates).await {
            Some(body) => parse_series_list(&body, &self.base_url),
            None => Vec::new(),
        }
    }

    pub async fn series_detail(&self, series_id: &str) -> Lookup<SeriesDetail> {
        let candidates = urls::series_detail(&self.base_url, series_id);
        let (url, body) = match self.fetch_first(&candidates).await {
            Fetched::Page { url, body } => (url, body),
            Fetched::NotFound => return Lookup::NotFound,
            Fetched::Unavailable => return Lookup::Unavailable,
        };

        let (mut detail, plan) = parse_series_detail(&body, &url, series_id, &self.base_url);
        detail.seasons = match plan {
            SeasonPlan::Resolved(seasons) => seasons,
            SeasonPlan::FollowLinks(links) => self.follow_season_links(links).await,
        };

        info!(
            "Series {}: {} seasons, {} episodes",
            detail.id,
            detail.seasons.len(),
            detail.seasons.iter().map(|s| s.episodes.len()).sum::<usize>()
        );
        Lookup::Found(detail)
    }

    /// Fetch season pages one by one; unreachable pages are left out
    async fn follow_season_links(&self, links: Vec<SeasonLink>) -> Vec<Season> {
        let mut seasons = Vec::with_capacity(links.len());

        for link in links {
            match self.fetcher.fetch_page(&link.url).await {
                Ok(body) => seasons.push(Season {
                    number: link.number,
                    episodes: parse_season_page(&body, &self.base_url, link.number),
                }),
                Err(e) => warn!("Skipping season {} ({}): {}", link.number, link.url, e),
            }
        }

        merge_seasons(seasons)
    }

    /// Streaming servers of one episode page; empty when none can be read
    pub async fn episode_servers(&self, episode_url: &str) -> Vec<Server> {
        let body = match self.fetcher.fetch_page(episode_url).await {
            Ok(body) => body,
            Err(_) => return Vec::new(),
        };

        let page = parse_server_page(&body, &self.base_url);
        self.resolve_servers(page, episode_url).await
    }

    // ============ MOVIES ============

    pub async fn movies_list(&self, page: u32) -> Vec<MovieSummary> {
        let candidates = urls::movies_list(&self.base_url, page);
        match self.fetch_listing(&candidates).await {
            Some(body) => parse_movies_list(&body, &self.base_url),
            None => Vec::new(),
        }
    }

    pub async fn movie_detail(&self, movie_id: &str) -> Lookup<MovieDetail> {
        let candidates = urls::movie_detail(&self.base_url, movie_id);
        let (url, body) = match self.fetch_first(&candidates).await {
            Fetched::Page { url, body } => (url, body),
            Fetched::NotFound => return Lookup::NotFound,
            Fetched::Unavailable => return Lookup::Unavailable,
        };

        let (mut detail, page) = parse_movie_detail(&body, &url, movie_id, &self.base_url);
        detail.servers = self.resolve_servers(page, &url).await;

        info!("Movie {}: {} servers", detail.id, detail.servers.len());
        Lookup::Found(detail)
    }

    // ============ SEARCH ============

    pub async fn search(&self, query: &str) -> SearchResult {
        let candidates = urls::search(&self.base_url, query);
        match self.fetch_listing(&candidates).await {
            Some(body) => parse_search(&body, &self.base_url),
            None => SearchResult::default(),
        }
    }

    // ============ SERVERS ============

    /// Resolve player options through the AJAX endpoint, one at a time.
    /// Inline script sources are only used when no server node produced one.
    async fn resolve_servers(&self, page: ServerPage, page_url: &str) -> Vec<Server> {
        let mut results = Vec::with_capacity(page.drafts.len());

        for draft in page.drafts {
            let result = match &draft.source {
                ServerSource::Direct(url) => Ok(url.clone()),
                ServerSource::Player { post, nume, kind } => {
                    self.resolve_player(post, nume, kind, page_url).await
                }
            };
            results.push(result.map(|url| draft.into_server(url)));
        }

        let servers = Extraction::collect("server", results).items;
        let servers = if servers.is_empty() {
            page.inline
        } else {
            servers
        };

        dedup_servers(servers)
    }

    async fn resolve_player(
        &self,
        post: &str,
        nume: &str,
        kind: &str,
        page_url: &str,
    ) -> Result<String, SkipReason> {
        let form = [
            ("action", "doo_player_ajax"),
            ("post", post),
            ("nume", nume),
            ("type", kind),
        ];

        let body = self
            .fetcher
            .post_form(&urls::player_ajax(&self.base_url), &form, page_url)
            .await
            .map_err(|e| {
                debug!("Player option {}/{} failed: {}", post, nume, e);
                SkipReason::UnresolvedPlayer
            })?;

        player_url_from_response(&body, &self.base_url).ok_or(SkipReason::UnresolvedPlayer)
    }
}

// ============ DOCUMENT PARSING ============

/// Server nodes of a page plus the inline script fallback
struct ServerPage {
    drafts: Vec<ServerDraft>,
    inline: Vec<Server>,
}

fn read_server_page(doc: &Document, base: &str) -> ServerPage {
    let nodes = SERVER_NODES.first_match_many(doc.root());
    let drafts = Extraction::collect(
        "server_node",
        nodes.into_iter().map(|node| extract_server(node, base)),
    );

    ServerPage {
        drafts: drafts.items,
        inline: inline_script_servers(doc.root(), base),
    }
}

fn parse_server_page(body: &str, base: &str) -> ServerPage {
    read_server_page(&Document::parse(body), base)
}

fn parse_home(body: &str, base: &str) -> HomeContent {
    let doc = Document::parse(body);
    let root = doc.root();

    let featured: Vec<SeriesSummary> = extract_cards(root, &HOME_FEATURED, base)
        .items
        .into_iter()
        .take(HOME_FEATURED_LIMIT)
        .map(SeriesSummary::from)
        .collect();

    let mut trending_series: Vec<SeriesSummary> = Vec::new();
    for card in extract_cards(root, &HOME_TRENDING_SERIES, base).items {
        if trending_series.len() == HOME_TRENDING_SERIES_LIMIT {
            break;
        }
        if trending_series.iter().all(|s| s.id != card.id) {
            trending_series.push(card.into());
        }
    }

    let trending_movies: Vec<MovieSummary> = extract_cards(root, &HOME_TRENDING_MOVIES, base)
        .items
        .into_iter()
        .take(HOME_TRENDING_MOVIES_LIMIT)
        .map(MovieSummary::from)
        .collect();

    let episodes = Extraction::collect(
        "recent_episode",
        HOME_RECENT_EPISODES
            .first_match_many(root)
            .into_iter()
            .map(|item| extract_recent_episode(item, base)),
    );
    let mut recent_episodes: Vec<RecentEpisode> = Vec::new();
    for episode in episodes.items {
        if recent_episodes.len() == HOME_RECENT_EPISODES_LIMIT {
            break;
        }
        if recent_episodes.iter().all(|e| e.url != episode.url) {
            recent_episodes.push(episode);
        }
    }

    info!(
        "Home: {} featured, {} series, {} movies, {} episodes",
        featured.len(),
        trending_series.len(),
        trending_movies.len(),
        recent_episodes.len()
    );

    HomeContent {
        featured,
        trending_series,
        trending_movies,
        recent_episodes,
    }
}

fn parse_series_list(body: &str, base: &str) -> Vec<SeriesSummary> {
    let doc = Document::parse(body);
    let cards = extract_cards(doc.root(), &SERIES_LIST_ITEMS, base);
    info!("Series list: {} items ({} skipped)", cards.items.len(), cards.skipped);
    cards.items.into_iter().map(SeriesSummary::from).collect()
}

fn parse_movies_list(body: &str, base: &str) -> Vec<MovieSummary> {
    let doc = Document::parse(body);
    let cards = extract_cards(doc.root(), &MOVIE_LIST_ITEMS, base);
    info!("Movie list: {} items ({} skipped)", cards.items.len(), cards.skipped);
    cards.items.into_iter().map(MovieSummary::from).collect()
}

/// Identifier of a detail page: its URL slug, or the requested id
fn page_identifier(url: &str, requested: &str) -> String {
    let id = identifier_from_url(url);
    if id.is_empty() {
        requested.to_string()
    } else {
        id
    }
}

fn parse_series_detail(
    body: &str,
    url: &str,
    requested_id: &str,
    base: &str,
) -> (SeriesDetail, SeasonPlan) {
    let doc = Document::parse(body);
    let id = page_identifier(url, requested_id);
    let fields = extract_detail_fields(doc.root(), &id, base);
    let plan = plan_seasons(doc.root(), base);

    let detail = SeriesDetail {
        id,
        title: fields.title,
        url: url.to_string(),
        image: fields.image,
        year: fields.year,
        rating: fields.rating,
        description: fields.description,
        genres: fields.genres,
        cast: fields.cast,
        seasons: Vec::new(),
    };
    (detail, plan)
}

fn parse_season_page(body: &str, base: &str, season: u32) -> Vec<Episode> {
    let doc = Document::parse(body);
    season_page_episodes(doc.root(), base, season)
}

fn parse_movie_detail(
    body: &str,
    url: &str,
    requested_id: &str,
    base: &str,
) -> (MovieDetail, ServerPage) {
    let doc = Document::parse(body);
    let id = page_identifier(url, requested_id);
    let fields = extract_detail_fields(doc.root(), &id, base);

    let detail = MovieDetail {
        id,
        title: fields.title,
        url: url.to_string(),
        image: fields.image,
        year: fields.year,
        rating: fields.rating,
        description: fields.description,
        duration: fields.duration,
        genres: fields.genres,
        cast: fields.cast,
        servers: Vec::new(),
    };
    (detail, read_server_page(&doc, base))
}

fn parse_search(body: &str, base: &str) -> SearchResult {
    let doc = Document::parse(body);
    let cards = extract_cards(doc.root(), &SEARCH_ITEMS, base);

    let mut result = SearchResult::default();
    for card in cards.items {
        match classify(card.badge.as_deref(), &card.url) {
            ContentKind::Series => result.series.push(card.into()),
            ContentKind::Movie => result.movies.push(card.into()),
        }
    }

    info!(
        "Search: {} series, {} movies ({} skipped)",
        result.series.len(),
        result.movies.len(),
        cards.skipped
    );
    result
}
