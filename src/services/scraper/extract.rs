//! Entity extractors
//!
//! Every extractor maps one matched node to a typed record. Items that cannot
//! produce a record come back as a [`SkipReason`] and are aggregated into an
//! [`Extraction`], so a single malformed card never aborts the page.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::cascade::Cascade;
use super::dom::{Document, Node};
use super::normalize::{
    clean_text, first_duration, first_year, identifier_from_url, is_link_candidate, non_empty,
    resolve, season_episode_from_slug,
};
use super::selectors::*;
use crate::models::{MovieSummary, RecentEpisode, SeriesSummary, Server, DEFAULT_SERVER_NAME};
use crate::services::metrics;

/// Cast names kept per detail page
pub const MAX_CAST: usize = 10;
/// Genres kept per detail page
pub const MAX_GENRES: usize = 5;

lazy_static! {
    /// "Actor:" / "Actores:" label preceding a linked cast list
    static ref CAST_LABEL: Regex = Regex::new(r"(?i)actor(es)?:").unwrap();
    /// `sources: [ ... ]` (or `source = [...]`) inside an inline player script
    static ref SOURCES_ARRAY: Regex = Regex::new(r"(?is)sources?\s*[:=]\s*\[(.*?)\]").unwrap();
    static ref SOURCE_OBJECT: Regex = Regex::new(r"(?s)\{(.*?)\}").unwrap();
    /// `key: "value"`, `'key': 'value'` or `key: 720` inside a source object
    static ref SOURCE_FIELD: Regex =
        Regex::new(r#"["']?(\w+)["']?\s*:\s*(?:"([^"]*)"|'([^']*)'|(\d+))"#).unwrap();
    static ref SRC_ATTR: Regex = Regex::new(r#"(?i)src=["']([^"']+)["']"#).unwrap();
}

// ============ PER-ITEM RESULTS ============

/// Why a matched node did not become a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SkipReason {
    #[error("no resolvable link")]
    MissingLink,
    #[error("link yields an empty identifier")]
    EmptyIdentifier,
    #[error("no server URL candidate")]
    MissingServerUrl,
    #[error("player option could not be resolved")]
    UnresolvedPlayer,
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::MissingLink => "missing_link",
            SkipReason::EmptyIdentifier => "empty_identifier",
            SkipReason::MissingServerUrl => "missing_server_url",
            SkipReason::UnresolvedPlayer => "unresolved_player",
        }
    }
}

/// Records extracted from a batch of nodes plus how many were dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

impl<T> Extraction<T> {
    /// Split per-item results, counting skips per reason in the metrics
    pub fn collect<I>(entity: &'static str, results: I) -> Self
    where
        I: IntoIterator<Item = Result<T, SkipReason>>,
    {
        let mut items = Vec::new();
        let mut reasons: BTreeMap<&'static str, u64> = BTreeMap::new();

        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(item) => items.push(item),
                Err(reason) => {
                    debug!(entity, index, "Skipped item: {}", reason);
                    *reasons.entry(reason.label()).or_default() += 1;
                }
            }
        }

        let mut skipped = 0;
        for (reason, count) in reasons {
            metrics::record_skipped(entity, reason, count);
            skipped += count as usize;
        }

        Self { items, skipped }
    }
}

// ============ SHARED FIELD HELPERS ============

/// Title chain: field text → anchor text → anchor `title` → identifier
pub fn title_or_fallback(field: Option<String>, link: Node<'_>, id: &str) -> String {
    field
        .or_else(|| non_empty(&link.text()))
        .or_else(|| link.attr("title").and_then(non_empty))
        .unwrap_or_else(|| id.to_string())
}

/// Absolute image URL from `src`, then `data-src`; inline `data:` placeholders don't count
pub fn image_url(node: Option<Node<'_>>, base: &str) -> Option<String> {
    let node = node?;
    IMAGE_ATTRS
        .iter()
        .filter_map(|name| node.attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty() && !value.starts_with("data:"))
        .map(|value| resolve(value, base))
}

/// Absolute URL of a link node, if its `href` is usable
pub fn link_url(link: Node<'_>, base: &str) -> Result<String, SkipReason> {
    let href = link
        .attr("href")
        .filter(|href| is_link_candidate(href))
        .ok_or(SkipReason::MissingLink)?;
    Ok(resolve(href, base))
}

/// Cleaned, de-duplicated texts of `nodes` in document order
fn distinct_names(nodes: &[Node<'_>], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .filter_map(|node| non_empty(&node.text()))
        .filter(|name| seen.insert(name.clone()))
        .take(limit)
        .collect()
}

/// The node that owns an item's sub-fields: its card when the item is a bare link
fn card_scope(item: Node<'_>) -> Node<'_> {
    if item.is(ENCLOSING_LINK) {
        item.find_ancestor(CARD_ANCESTOR).unwrap_or(item)
    } else {
        item
    }
}

// ============ CARDS ============

/// Fields shared by every catalog card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub url: String,
    pub image: Option<String>,
    pub year: Option<u16>,
    pub rating: Option<String>,
    /// Type/badge label, only read by search classification
    pub badge: Option<String>,
}

/// Extract a series or movie card
pub fn extract_card(item: Node<'_>, base: &str) -> Result<Card, SkipReason> {
    let scope = card_scope(item);
    let link = if item.is(ENCLOSING_LINK) {
        Some(item)
    } else {
        CARD_LINK
            .first_match(scope)
            .or_else(|| item.find_ancestor(ENCLOSING_LINK))
    }
    .ok_or(SkipReason::MissingLink)?;

    let url = link_url(link, base)?;
    let id = identifier_from_url(&url);
    if id.is_empty() {
        return Err(SkipReason::EmptyIdentifier);
    }

    let year = CARD_YEAR
        .text(scope)
        .and_then(|text| first_year(&text))
        .or_else(|| CARD_INFO.text(scope).and_then(|text| first_year(&text)));

    Ok(Card {
        title: title_or_fallback(CARD_TITLE.text(scope), link, &id),
        image: image_url(CARD_IMAGE.first_match(scope), base),
        year,
        rating: CARD_RATING.text(scope),
        badge: SEARCH_TYPE_BADGE.text(scope),
        id,
        url,
    })
}

impl From<Card> for SeriesSummary {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            title: card.title,
            url: card.url,
            image: card.image,
            year: card.year,
            rating: card.rating,
        }
    }
}

impl From<Card> for MovieSummary {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            title: card.title,
            url: card.url,
            image: card.image,
            year: card.year,
            rating: card.rating,
        }
    }
}

/// Extract every card matched by `cascade`
pub fn extract_cards(
    root: Node<'_>,
    cascade: &Cascade,
    base: &str,
) -> Extraction<Card> {
    let nodes = cascade.first_match_many(root);
    Extraction::collect(
        cascade.name(),
        nodes.into_iter().map(|node| extract_card(node, base)),
    )
}

/// Latest-episode card from the home page
pub fn extract_recent_episode(item: Node<'_>, base: &str) -> Result<RecentEpisode, SkipReason> {
    let scope = card_scope(item);
    let link = if item.is(ENCLOSING_LINK) {
        Some(item)
    } else {
        EPISODE_LINK
            .first_match(scope)
            .or_else(|| item.find_ancestor(ENCLOSING_LINK))
    }
    .ok_or(SkipReason::MissingLink)?;

    let url = link_url(link, base)?;
    let slug = identifier_from_url(&url);
    if slug.is_empty() {
        return Err(SkipReason::EmptyIdentifier);
    }

    let (season_number, episode_number) = match season_episode_from_slug(&slug) {
        Some((season, episode)) => (Some(season), Some(episode)),
        None => (None, None),
    };

    Ok(RecentEpisode {
        title: title_or_fallback(CARD_TITLE.text(scope), link, &slug),
        image: image_url(CARD_IMAGE.first_match(scope), base),
        episode: RECENT_EPISODE_LABEL.text(scope).or(Some(slug)),
        season_number,
        episode_number,
        url,
    })
}

// ============ DETAIL PAGES ============

/// Descriptive fields shared by series and movie detail pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub title: String,
    pub image: Option<String>,
    pub year: Option<u16>,
    pub rating: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u32>,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
}

pub fn extract_detail_fields(root: Node<'_>, id: &str, base: &str) -> DetailFields {
    let info = DETAIL_INFO.text(root);

    let year = DETAIL_YEAR
        .text(root)
        .and_then(|text| first_year(&text))
        .or_else(|| info.as_deref().and_then(first_year));
    let duration = DETAIL_DURATION
        .text(root)
        .and_then(|text| first_duration(&text))
        .or_else(|| info.as_deref().and_then(first_duration));

    DetailFields {
        title: DETAIL_TITLE.text(root).unwrap_or_else(|| id.to_string()),
        image: image_url(DETAIL_IMAGE.first_match(root), base),
        year,
        rating: DETAIL_RATING.text(root),
        description: DETAIL_DESCRIPTION.text(root),
        duration,
        genres: distinct_names(&DETAIL_GENRES.first_match_many(root), MAX_GENRES),
        cast: extract_cast(root),
    }
}

fn extract_cast(root: Node<'_>) -> Vec<String> {
    let linked = DETAIL_CAST.first_match_many(root);
    if !linked.is_empty() {
        return distinct_names(&linked, MAX_CAST);
    }

    // Smallest block carrying the label and at least one link
    let block = root
        .select_all(CAST_LABEL_BLOCKS)
        .into_iter()
        .filter(|block| CAST_LABEL.is_match(&block.text()))
        .filter(|block| block.select_first("a").is_some())
        .min_by_key(|block| block.text().len());

    match block {
        Some(block) => distinct_names(&block.select_all("a"), MAX_CAST),
        None => Vec::new(),
    }
}

// ============ SERVERS ============

/// Where a server's URL comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerSource {
    /// Absolute URL read straight from the markup
    Direct(String),
    /// Player option that must be resolved through the player AJAX endpoint
    Player {
        post: String,
        nume: String,
        kind: String,
    },
}

/// Server node read from the page, before player resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDraft {
    pub name: String,
    pub source: ServerSource,
    pub quality: Option<String>,
    pub language: Option<String>,
}

impl ServerDraft {
    /// Finish the draft with a resolved URL
    pub fn into_server(self, url: String) -> Server {
        Server {
            name: self.name,
            url,
            quality: self.quality,
            language: self.language,
        }
    }
}

/// URL candidate chain: data attributes → `data-post` → frame → `href` → option `value`
fn server_source(node: Node<'_>, base: &str) -> Option<ServerSource> {
    let usable = |value: &&str| is_link_candidate(value);

    if let Some(value) = SERVER_URL_ATTRS
        .iter()
        .filter_map(|name| node.attr(name))
        .find(usable)
    {
        return Some(ServerSource::Direct(resolve(value, base)));
    }

    if let Some(post) = node.attr("data-post").map(str::trim).filter(usable) {
        return Some(match node.attr("data-nume").map(str::trim).filter(usable) {
            Some(nume) => ServerSource::Player {
                post: post.to_string(),
                nume: nume.to_string(),
                kind: node
                    .first_attr(&["data-type"])
                    .unwrap_or_else(|| "iframe".to_string()),
            },
            None => ServerSource::Direct(resolve(post, base)),
        });
    }

    if let Some(value) = SERVER_FRAME
        .first_match(node)
        .and_then(|frame| frame.first_attr(FRAME_URL_ATTRS))
        .filter(|value| is_link_candidate(value))
    {
        return Some(ServerSource::Direct(resolve(&value, base)));
    }

    let mut fallback = vec![node.attr("href")];
    if node.tag_name() == "option" {
        fallback.push(node.attr("value"));
    }
    fallback
        .into_iter()
        .flatten()
        .find(usable)
        .map(|value| ServerSource::Direct(resolve(value, base)))
}

pub fn extract_server(node: Node<'_>, base: &str) -> Result<ServerDraft, SkipReason> {
    let source = server_source(node, base).ok_or(SkipReason::MissingServerUrl)?;

    let name = SERVER_NAME
        .text(node)
        .or_else(|| non_empty(&node.text()))
        .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string());
    let quality = SERVER_QUALITY.text(node).or_else(|| {
        node.first_attr(SERVER_QUALITY_ATTRS)
            .and_then(|value| non_empty(&value))
    });
    let language = node
        .first_attr(SERVER_LANGUAGE_ATTRS)
        .and_then(|value| non_empty(&value));

    Ok(ServerDraft {
        name,
        source,
        quality,
        language,
    })
}

/// Player URL from an AJAX player response.
///
/// A JSON object body only counts through its `embed_url` field (a URL or
/// iframe markup). Any other body is read as iframe markup or a bare URL;
/// failure bodies such as `0` or `-1` yield `None`.
pub fn player_url_from_response(body: &str, base: &str) -> Option<String> {
    let body = body.trim();
    let parsed = serde_json::from_str::<Value>(body).ok();
    let markup = match &parsed {
        Some(Value::Object(json)) => json.get("embed_url").and_then(Value::as_str)?.trim(),
        _ => body,
    };
    if markup.is_empty() {
        return None;
    }

    if !markup.contains('<') {
        return looks_like_url(markup).then(|| resolve(markup, base));
    }

    let doc = Document::parse(markup);
    doc.select_first("iframe")
        .and_then(|frame| frame.first_attr(FRAME_URL_ATTRS))
        .or_else(|| {
            SRC_ATTR
                .captures(markup)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .filter(|url| is_link_candidate(url))
        .map(|url| resolve(&url, base))
}

/// Absolute http(s) URL, protocol-relative URL or root-relative path
fn looks_like_url(text: &str) -> bool {
    if text.starts_with('/') {
        return true;
    }
    Url::parse(text)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Servers declared in inline `sources: [...]` script arrays
pub fn inline_script_servers(root: Node<'_>, base: &str) -> Vec<Server> {
    let mut servers = Vec::new();

    for script in root.select_all(INLINE_SCRIPTS) {
        let body = script.inner_html();
        for array in SOURCES_ARRAY.captures_iter(&body) {
            let Some(entries) = array.get(1) else { continue };
            for object in SOURCE_OBJECT.captures_iter(entries.as_str()) {
                let Some(fields) = object.get(1) else { continue };
                if let Some(server) = source_object_server(fields.as_str(), base) {
                    servers.push(server);
                }
            }
        }
    }

    servers
}

fn source_object_server(object: &str, base: &str) -> Option<Server> {
    let fields: HashMap<String, String> = SOURCE_FIELD
        .captures_iter(object)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps.get(2).or(caps.get(3)).or(caps.get(4))?.as_str();
            Some((key, clean_text(value)))
        })
        .collect();
    let field = |keys: &[&str]| {
        keys.iter()
            .filter_map(|key| fields.get(*key))
            .find(|value| !value.is_empty())
            .cloned()
    };

    let url = field(&["file", "src", "url"]).filter(|url| is_link_candidate(url))?;
    Some(Server {
        name: field(&["label", "title"]).unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
        url: resolve(&url, base),
        quality: field(&["res", "quality"]),
        language: field(&["lang", "language"]),
    })
}

/// Keep the first server per URL
pub fn dedup_servers(servers: Vec<Server>) -> Vec<Server> {
    let mut seen = HashSet::new();
    servers
        .into_iter()
        .filter(|server| seen.insert(server.url.clone()))
        .collect()
}
