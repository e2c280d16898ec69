//! Series vs movie classification for search results.
//!
//! An item is a series when its type badge mentions a series token or its
//! URL contains a series path segment. Items with neither signal default to
//! [`ContentKind::Movie`]; that default is a heuristic, not a guarantee.

/// Badge substrings that mark a series ("Serie", "Series", "TV")
const SERIES_TOKENS: &[&str] = &["serie", "tv"];

/// URL path segments that only series pages use
const SERIES_PATH_SEGMENTS: &[&str] = &["/serie/", "/series/", "/tv/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Series,
    Movie,
}

pub fn classify(badge: Option<&str>, url: &str) -> ContentKind {
    let badge = badge.unwrap_or_default().to_lowercase();
    let by_badge = SERIES_TOKENS.iter().any(|token| badge.contains(token));

    let url = url.to_lowercase();
    let by_path = SERIES_PATH_SEGMENTS
        .iter()
        .any(|segment| url.contains(segment));

    if by_badge || by_path {
        ContentKind::Series
    } else {
        ContentKind::Movie
    }
}
