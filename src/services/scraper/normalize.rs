//! URL and text normalization plus the numeric patterns read out of page text.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref SCHEME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
    static ref DURATION: Regex = Regex::new(r"(?i)(\d+)\s*min").unwrap();
    static ref NUMBER: Regex = Regex::new(r"\d+").unwrap();
    /// `show-name-2x05` → season 2, episode 5
    static ref SEASON_EPISODE_SLUG: Regex = Regex::new(r"-(\d+)x(\d+)$").unwrap();
    /// `show-name-3` → season 3
    static ref SEASON_SLUG: Regex = Regex::new(r"-(\d+)$").unwrap();
}

/// Make a URL absolute against `base`.
///
/// Values with a scheme pass through untouched, protocol-relative values
/// (`//cdn/...`) borrow the base scheme, everything else is joined to the
/// base with exactly one slash. Empty input stays empty.
pub fn resolve(raw: &str, base: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if raw.starts_with("//") {
        let scheme = Url::parse(base)
            .map(|u| u.scheme().to_string())
            .unwrap_or_else(|_| "https".to_string());
        return format!("{}:{}", scheme, raw);
    }

    if SCHEME.is_match(raw) {
        return raw.to_string();
    }

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        raw.trim_start_matches('/')
    )
}

/// Last non-empty path segment of a URL (its slug)
pub fn identifier_from_url(url: &str) -> String {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    trimmed
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Trim and collapse every whitespace run to a single space
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `None` for blank text, cleaned text otherwise
pub fn non_empty(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Attribute values that can never be a usable link
pub fn is_link_candidate(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !value.starts_with('#')
        && !value.to_ascii_lowercase().starts_with("javascript:")
}

/// First 4-digit number in the text
pub fn first_year(text: &str) -> Option<u16> {
    YEAR.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First `N min` runtime in the text, in minutes
pub fn first_duration(text: &str) -> Option<u32> {
    DURATION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Last number in the text (`"1 - 3"` → 3, `"Temporada 2"` → 2)
pub fn last_number(text: &str) -> Option<u32> {
    NUMBER
        .find_iter(text)
        .last()
        .and_then(|m| m.as_str().parse().ok())
        .filter(|n| *n > 0)
}

/// Season and episode encoded as a trailing `-<season>x<episode>` in a slug
pub fn season_episode_from_slug(slug: &str) -> Option<(u32, u32)> {
    let caps = SEASON_EPISODE_SLUG.captures(slug)?;
    let season: u32 = caps.get(1)?.as_str().parse().ok()?;
    let episode: u32 = caps.get(2)?.as_str().parse().ok()?;
    if season == 0 || episode == 0 {
        return None;
    }
    Some((season, episode))
}

/// Season number encoded as a trailing `-<n>` in a season page slug
pub fn season_from_slug(slug: &str) -> Option<u32> {
    SEASON_SLUG
        .captures(slug)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|n| *n > 0)
}
