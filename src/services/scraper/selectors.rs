//! Selector cascades for every section and field the scraper reads.
//!
//! Each list is ordered newest template first. Supporting a new site
//! template means appending one expression to the affected cascades.

use super::cascade::Cascade;

// ============================================================================
// Listing and home sections
// ============================================================================

pub const SERIES_LIST_ITEMS: Cascade = Cascade::new(
    "series_list_items",
    &[
        ".TPost.B",
        ".items .item",
        ".series-list .item",
        "article.item",
        ".tvshows article",
    ],
);

pub const MOVIE_LIST_ITEMS: Cascade = Cascade::new(
    "movie_list_items",
    &[
        ".TPost.B",
        ".items .item",
        ".movies-list .item",
        "article.item",
        ".movies article",
    ],
);

pub const HOME_FEATURED: Cascade = Cascade::new(
    "home_featured",
    &[".TPost.A", ".slider .slide", ".featured .item", ".highlight .item"],
);

pub const HOME_TRENDING_SERIES: Cascade = Cascade::new(
    "home_trending_series",
    &[
        ".TPost.B, .TPost.C",
        ".series-list .item",
        ".series .item",
        ".tvshows .item",
    ],
);

pub const HOME_TRENDING_MOVIES: Cascade = Cascade::new(
    "home_trending_movies",
    &[".movies-list .item", ".movies .item", ".films .item"],
);

pub const HOME_RECENT_EPISODES: Cascade = Cascade::new(
    "home_recent_episodes",
    &[
        r#"a[href*="/episodio/"]"#,
        ".episodes .item",
        ".recent-episodes .item",
        ".latest .item",
    ],
);

pub const SEARCH_ITEMS: Cascade = Cascade::new(
    "search_items",
    &[
        ".TPost.B, .TPost.A, .TPost.C, article.TPost",
        ".items .item",
        ".search-results .item",
        "article.item",
        ".result-item",
    ],
);

// ============================================================================
// Card fields
// ============================================================================

/// Card that owns an item matched as a bare link
pub const CARD_ANCESTOR: &str = ".TPost, article, li";

/// Link wrapping a card that has none inside
pub const ENCLOSING_LINK: &str = "a[href]";

pub const CARD_LINK: Cascade = Cascade::new(
    "card_link",
    &[r#"a[href*="/serie/"]"#, r#"a[href*="/pelicula/"]"#, "a[href]"],
);

pub const CARD_TITLE: Cascade = Cascade::new(
    "card_title",
    &[".Title", ".title", ".data h3", "h2", "h3", ".name"],
);

pub const CARD_IMAGE: Cascade = Cascade::new(
    "card_image",
    &[".Image img", "figure img", ".poster img", "img"],
);

pub const CARD_YEAR: Cascade = Cascade::new("card_year", &[".Qlty", ".year", ".date"]);

pub const CARD_INFO: Cascade = Cascade::new("card_info", &[".Info", ".data", ".meta"]);

pub const CARD_RATING: Cascade = Cascade::new("card_rating", &[".rating", ".imdb", ".vote"]);

pub const SEARCH_TYPE_BADGE: Cascade =
    Cascade::new("search_type_badge", &[".type", ".badge", ".item-type"]);

pub const RECENT_EPISODE_LABEL: Cascade =
    Cascade::new("recent_episode_label", &[".ep-num", ".episode"]);

// ============================================================================
// Detail pages
// ============================================================================

pub const DETAIL_TITLE: Cascade = Cascade::new(
    "detail_title",
    &["h1.Title", ".data h1", "h1", ".Title", ".title"],
);

pub const DETAIL_IMAGE: Cascade = Cascade::new(
    "detail_image",
    &[
        ".poster img",
        ".TPost .Image img",
        ".Image img",
        ".thumbnail img",
        "article img",
        "figure img",
    ],
);

pub const DETAIL_DESCRIPTION: Cascade = Cascade::new(
    "detail_description",
    &[
        ".Description",
        ".description",
        ".wp-content",
        ".TPMvCn p",
        ".summary p",
        ".texto",
    ],
);

pub const DETAIL_YEAR: Cascade = Cascade::new(
    "detail_year",
    &[".Info .Qlty", ".Qlty", ".year", ".date", ".release-date"],
);

pub const DETAIL_INFO: Cascade =
    Cascade::new("detail_info", &[".Info", ".extra", ".meta", ".data"]);

pub const DETAIL_RATING: Cascade = Cascade::new(
    "detail_rating",
    &[".rating", ".imdb", ".dt_rating_vgs", ".vote"],
);

pub const DETAIL_DURATION: Cascade = Cascade::new(
    "detail_duration",
    &[".duration", ".runtime", ".Info .Time"],
);

pub const DETAIL_GENRES: Cascade = Cascade::new(
    "detail_genres",
    &[
        ".genres a",
        ".genre a",
        ".sgeneros a",
        r#"a[href*="/genero/"]"#,
    ],
);

pub const DETAIL_CAST: Cascade = Cascade::new(
    "detail_cast",
    &[".cast a", ".actor a", ".persons a", ".InfoList .loadactor a"],
);

/// Blocks scanned for an "Actores:" label when no cast cascade matches
pub const CAST_LABEL_BLOCKS: &str = "li, p, span, div";

// ============================================================================
// Seasons and episodes
// ============================================================================

pub const SEASON_CONTAINERS: Cascade =
    Cascade::new("season_containers", &[".season", ".se-c", "#seasons .se-q"]);

pub const SEASON_NUMBER: Cascade = Cascade::new(
    "season_number",
    &[".se-t", ".season-number", ".season-title"],
);

pub const SEASON_EPISODES: Cascade = Cascade::new(
    "season_episodes",
    &[".episode", ".episodio", ".se-a li", ".eps-item"],
);

pub const SEASON_LINKS: Cascade = Cascade::new(
    "season_links",
    &[r#"a[href*="/temporada/"]"#, r#"a[href*="/season/"]"#],
);

pub const EPISODE_LINKS: Cascade = Cascade::new(
    "episode_links",
    &[
        r#"a[href*="/episodio/"]"#,
        r#"a[href*="/episode/"]"#,
        r#"a[href*="/capitulo/"]"#,
    ],
);

pub const EPISODE_LINK: Cascade = Cascade::new(
    "episode_link",
    &[r#"a[href*="/episodio/"]"#, "a[href]"],
);

pub const EPISODE_NUMBER: Cascade = Cascade::new(
    "episode_number",
    &[".episode-number", ".numerando", ".epl-num"],
);

pub const EPISODE_TITLE: Cascade = Cascade::new(
    "episode_title",
    &[".episodiotitle", ".epl-title", ".Title", ".title"],
);

pub const EPISODE_IMAGE: Cascade = Cascade::new("episode_image", &[".Image img", "img"]);

// ============================================================================
// Servers
// ============================================================================

pub const SERVER_NODES: Cascade = Cascade::new(
    "server_nodes",
    &[
        "#playeroptionsul li",
        ".playeroptions li",
        "li.dooplay_player_option",
        "li[data-post][data-nume]",
        "select option[data-post], select option[data-video], select option[data-embed]",
        ".server, .player-option, .option, li[data-video], .play-box-iframe, li[data-embed], button[data-video], button[data-embed]",
    ],
);

pub const SERVER_NAME: Cascade =
    Cascade::new("server_name", &[".server-name", ".title", "span"]);

pub const SERVER_QUALITY: Cascade = Cascade::new("server_quality", &[".quality", ".qlty"]);

pub const SERVER_FRAME: Cascade = Cascade::new("server_frame", &["iframe"]);

/// Script bodies scanned for inline `sources: [...]` declarations
pub const INLINE_SCRIPTS: &str = "script";

// ============================================================================
// Attribute fallback chains
// ============================================================================

pub const IMAGE_ATTRS: &[&str] = &["src", "data-src"];

/// Direct URL attributes on a server node, in priority order
pub const SERVER_URL_ATTRS: &[&str] = &[
    "data-video",
    "data-src",
    "data-url",
    "data-embed",
    "data-link",
    "data-file",
];

pub const FRAME_URL_ATTRS: &[&str] = &["src", "data-src"];

pub const SERVER_QUALITY_ATTRS: &[&str] = &["data-quality", "data-res"];

pub const SERVER_LANGUAGE_ATTRS: &[&str] = &["data-lang", "data-language"];
