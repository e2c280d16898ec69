//! Season/episode hierarchy reconstruction
//!
//! A series page describes its episodes in one of three ways, tried in this
//! order and never combined:
//!
//! 1. explicit season containers holding episode nodes,
//! 2. links to per-season pages (`/temporada/<slug>-<n>`), fetched by the caller,
//! 3. bare episode links whose slugs end in `-<season>x<episode>`.
//!
//! Whatever the path, seasons are unique by number and ascending, episodes
//! are unique by number within a season and ascending. The first occurrence
//! of a duplicate number wins.

use std::collections::{BTreeMap, HashSet};

use super::dom::Node;
use super::extract::{image_url, link_url, title_or_fallback, Extraction, SkipReason};
use super::normalize::{
    identifier_from_url, last_number, non_empty, season_episode_from_slug, season_from_slug,
};
use super::selectors::*;
use crate::models::{default_episode_title, Episode, Season};

/// Season assumed for episodes that carry no season information
pub const DEFAULT_SEASON: u32 = 1;

/// Link to a season page found on a series page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonLink {
    pub number: u32,
    pub url: String,
}

/// How the seasons of a series page are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonPlan {
    /// Everything was on the page
    Resolved(Vec<Season>),
    /// Season pages must be fetched, in this order
    FollowLinks(Vec<SeasonLink>),
}

/// Pick the reconstruction path for a series page
pub fn plan_seasons(root: Node<'_>, base: &str) -> SeasonPlan {
    let containers = SEASON_CONTAINERS.first_match_many(root);
    if !containers.is_empty() {
        return SeasonPlan::Resolved(seasons_from_containers(&containers, base));
    }

    let links = season_links(root, base);
    if !links.is_empty() {
        return SeasonPlan::FollowLinks(links);
    }

    SeasonPlan::Resolved(seasons_from_episode_links(root, base))
}

// ============ EXPLICIT CONTAINERS ============

fn seasons_from_containers(containers: &[Node<'_>], base: &str) -> Vec<Season> {
    let seasons = containers.iter().enumerate().map(|(index, container)| {
        let number = SEASON_NUMBER
            .text(*container)
            .and_then(|text| last_number(&text))
            .unwrap_or(index as u32 + 1);

        let nodes = SEASON_EPISODES.first_match_many(*container);
        let episodes = Extraction::collect(
            "episode",
            nodes
                .into_iter()
                .enumerate()
                .map(|(position, node)| container_episode(node, position as u32 + 1, base)),
        );

        Season {
            number,
            episodes: sort_episodes(episodes.items),
        }
    });

    merge_seasons(seasons)
}

/// Episode node inside a season container; `position` is 1-based
fn container_episode(node: Node<'_>, position: u32, base: &str) -> Result<Episode, SkipReason> {
    let link = if node.is(ENCLOSING_LINK) {
        Some(node)
    } else {
        EPISODE_LINK.first_match(node)
    }
    .ok_or(SkipReason::MissingLink)?;
    let url = link_url(link, base)?;

    let number = EPISODE_NUMBER
        .text(node)
        .and_then(|text| last_number(&text))
        .unwrap_or(position);

    Ok(Episode {
        number,
        title: title_or_fallback(EPISODE_TITLE.text(node), link, &default_episode_title(number)),
        url,
        image: image_url(EPISODE_IMAGE.first_match(node), base),
        servers: Vec::new(),
    })
}

// ============ SEASON PAGE LINKS ============

/// Distinct season page links, ascending by number (first link per number wins)
pub fn season_links(root: Node<'_>, base: &str) -> Vec<SeasonLink> {
    let mut by_number = BTreeMap::new();

    for link in SEASON_LINKS.first_match_many(root) {
        let Ok(url) = link_url(link, base) else { continue };
        let Some(number) = season_from_slug(&identifier_from_url(&url)) else {
            continue;
        };
        by_number.entry(number).or_insert(url);
    }

    by_number
        .into_iter()
        .map(|(number, url)| SeasonLink { number, url })
        .collect()
}

/// Episodes listed on a season page; every episode belongs to `season`
pub fn season_page_episodes(root: Node<'_>, base: &str, season: u32) -> Vec<Episode> {
    assign_numbers(linked_episodes(root, base), Some(season))
        .remove(&season)
        .map(|episodes| episodes.into_values().collect())
        .unwrap_or_default()
}

// ============ SLUG INFERENCE ============

/// Episode link before numbering
struct LinkedEpisode {
    url: String,
    slug_numbers: Option<(u32, u32)>,
    title: Option<String>,
    image: Option<String>,
}

fn linked_episodes(root: Node<'_>, base: &str) -> Vec<LinkedEpisode> {
    let links = EPISODE_LINKS.first_match_many(root);
    let mut seen = HashSet::new();

    let extraction = Extraction::collect(
        "episode_link",
        links.into_iter().map(|link| {
            let url = link_url(link, base)?;
            let slug = identifier_from_url(&url);
            if slug.is_empty() {
                return Err(SkipReason::EmptyIdentifier);
            }

            let card = link.find_ancestor(CARD_ANCESTOR);
            let title = card
                .and_then(|card| EPISODE_TITLE.text(card))
                .or_else(|| non_empty(&link.text()))
                .or_else(|| link.attr("title").and_then(non_empty));
            let image = image_url(
                card.and_then(|card| EPISODE_IMAGE.first_match(card))
                    .or_else(|| EPISODE_IMAGE.first_match(link)),
                base,
            );

            Ok(LinkedEpisode {
                slug_numbers: season_episode_from_slug(&slug),
                url,
                title,
                image,
            })
        }),
    );

    // A card often links the same episode twice (thumbnail and title)
    extraction
        .items
        .into_iter()
        .filter(|episode| seen.insert(episode.url.clone()))
        .collect()
}

/// Number linked episodes: slug numbers when present, otherwise the running
/// count of the default season plus one
fn assign_numbers(
    linked: Vec<LinkedEpisode>,
    season_override: Option<u32>,
) -> BTreeMap<u32, BTreeMap<u32, Episode>> {
    let mut seasons: BTreeMap<u32, BTreeMap<u32, Episode>> = BTreeMap::new();

    for episode in linked {
        let (season, number) = match (episode.slug_numbers, season_override) {
            (Some((_, number)), Some(season)) => (season, number),
            (Some((season, number)), None) => (season, number),
            (None, season) => {
                let season = season.unwrap_or(DEFAULT_SEASON);
                let count = seasons.get(&season).map_or(0, BTreeMap::len);
                (season, count as u32 + 1)
            }
        };

        seasons
            .entry(season)
            .or_default()
            .entry(number)
            .or_insert_with(|| Episode {
                number,
                title: episode
                    .title
                    .unwrap_or_else(|| default_episode_title(number)),
                url: episode.url,
                image: episode.image,
                servers: Vec::new(),
            });
    }

    seasons
}

fn seasons_from_episode_links(root: Node<'_>, base: &str) -> Vec<Season> {
    assign_numbers(linked_episodes(root, base), None)
        .into_iter()
        .map(|(number, episodes)| Season {
            number,
            episodes: episodes.into_values().collect(),
        })
        .filter(|season| !season.episodes.is_empty())
        .collect()
}

// ============ ORDERING AND DEDUPLICATION ============

/// First episode per number, ascending
pub fn sort_episodes(episodes: Vec<Episode>) -> Vec<Episode> {
    let mut by_number = BTreeMap::new();
    for episode in episodes {
        by_number.entry(episode.number).or_insert(episode);
    }
    by_number.into_values().collect()
}

/// First non-empty season per number, ascending
pub fn merge_seasons<I>(seasons: I) -> Vec<Season>
where
    I: IntoIterator<Item = Season>,
{
    let mut by_number = BTreeMap::new();
    for season in seasons {
        if season.episodes.is_empty() {
            continue;
        }
        by_number.entry(season.number).or_insert(season);
    }
    by_number.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scraper::dom::Document;
    use crate::services::scraper::fixtures;

    const BASE: &str = "https://site.test";

    fn resolved(plan: SeasonPlan) -> Vec<Season> {
        match plan {
            SeasonPlan::Resolved(seasons) => seasons,
            SeasonPlan::FollowLinks(links) => panic!("unexpected season links: {:?}", links),
        }
    }

    fn numbers(season: &Season) -> Vec<u32> {
        season.episodes.iter().map(|e| e.number).collect()
    }

    #[test]
    fn test_container_episodes_are_sorted() {
        let doc = Document::parse(fixtures::SERIES_DETAIL_CONTAINERS);
        let seasons = resolved(plan_seasons(doc.root(), BASE));

        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].number, 1);
        assert_eq!(numbers(&seasons[0]), vec![1, 2, 3]);
        assert_eq!(seasons[0].episodes[0].title, "The Target");
        assert_eq!(
            seasons[0].episodes[0].url,
            "https://site.test/episodio/the-wire-1x01/"
        );
        assert!(seasons[0].episodes.iter().all(|e| e.servers.is_empty()));
    }

    #[test]
    fn test_duplicate_season_first_wins() {
        let doc = Document::parse(fixtures::SERIES_DETAIL_DUPLICATE_SEASON);
        let seasons = resolved(plan_seasons(doc.root(), BASE));

        let season_numbers: Vec<u32> = seasons.iter().map(|s| s.number).collect();
        assert_eq!(season_numbers, vec![2, 9]);
        assert_eq!(seasons[1].episodes.len(), 1);
        assert_eq!(seasons[1].episodes[0].title, "First nine");
    }

    #[test]
    fn test_container_duplicate_episode_number_first_wins() {
        let doc = Document::parse(
            r#"<div class="season"><div class="se-t">1</div><ul>
                 <li class="episode"><span class="numerando">1 - 2</span><div class="episodiotitle"><a href="/episodio/x-1x02/">Original</a></div></li>
                 <li class="episode"><span class="numerando">1 - 1</span><div class="episodiotitle"><a href="/episodio/x-1x01/">Pilot</a></div></li>
                 <li class="episode"><span class="numerando">1 - 2</span><div class="episodiotitle"><a href="/episodio/x-1x02-bis/">Repeat</a></div></li>
               </ul></div>"#,
        );
        let seasons = resolved(plan_seasons(doc.root(), BASE));

        assert_eq!(seasons.len(), 1);
        assert_eq!(numbers(&seasons[0]), vec![1, 2]);
        assert_eq!(seasons[0].episodes[1].title, "Original");
        assert_eq!(seasons[0].episodes[1].url, "https://site.test/episodio/x-1x02/");
    }

    #[test]
    fn test_position_fallback_and_default_title() {
        let doc = Document::parse(
            r#"<div class="season">
                 <div class="episode"><a href="/episodio/a/"></a></div>
                 <div class="episode"><span>no link</span></div>
                 <div class="episode"><a href="/episodio/c/">Third</a></div>
               </div>"#,
        );
        let seasons = resolved(plan_seasons(doc.root(), BASE));
        assert_eq!(seasons[0].number, 1);
        assert_eq!(numbers(&seasons[0]), vec![1, 3]);
        assert_eq!(seasons[0].episodes[0].title, "Episodio 1");
        assert_eq!(seasons[0].episodes[1].title, "Third");
    }

    #[test]
    fn test_slug_inference() {
        let doc = Document::parse(fixtures::SERIES_DETAIL_EPISODE_LINKS);
        let seasons = resolved(plan_seasons(doc.root(), BASE));

        let season_numbers: Vec<u32> = seasons.iter().map(|s| s.number).collect();
        assert_eq!(season_numbers, vec![1, 2]);
        assert_eq!(numbers(&seasons[0]), vec![1, 2]);
        assert_eq!(numbers(&seasons[1]), vec![5]);
        assert_eq!(seasons[1].episodes[0].url, "https://site.test/episodio/show-2x05/");
    }

    #[test]
    fn test_slug_without_pattern_uses_running_count() {
        let doc = Document::parse(
            r#"<a href="/episodio/show/">A</a>
               <a href="/episodio/show/">A again</a>
               <a href="/episodio/show-extra/">B</a>"#,
        );
        let seasons = resolved(plan_seasons(doc.root(), BASE));
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].number, DEFAULT_SEASON);
        assert_eq!(numbers(&seasons[0]), vec![1, 2]);
        assert_eq!(seasons[0].episodes[0].title, "A");
    }

    #[test]
    fn test_season_links_plan() {
        let doc = Document::parse(fixtures::SERIES_DETAIL_SEASON_LINKS);
        match plan_seasons(doc.root(), BASE) {
            SeasonPlan::FollowLinks(links) => {
                let found: Vec<(u32, &str)> =
                    links.iter().map(|l| (l.number, l.url.as_str())).collect();
                assert_eq!(
                    found,
                    vec![
                        (1, "https://site.test/temporada/dark-1/"),
                        (2, "https://site.test/temporada/dark-2/"),
                    ]
                );
            }
            SeasonPlan::Resolved(seasons) => panic!("expected links, got {:?}", seasons),
        }
    }

    #[test]
    fn test_season_page_episodes_use_link_season() {
        let doc = Document::parse(fixtures::SEASON_PAGE_DARK_2);
        let episodes = season_page_episodes(doc.root(), BASE, 2);
        let found: Vec<u32> = episodes.iter().map(|e| e.number).collect();
        assert_eq!(found, vec![1, 2]);
        assert_eq!(episodes[0].title, "Secretos");
        assert_eq!(episodes[0].image.as_deref(), Some("https://site.test/img/d21.jpg"));
    }

    #[test]
    fn test_merge_seasons_drops_empty() {
        let season = |number: u32, episodes: usize| Season {
            number,
            episodes: (1..=episodes as u32)
                .map(|n| Episode {
                    number: n,
                    title: default_episode_title(n),
                    url: format!("https://site.test/e/{}-{}", number, n),
                    image: None,
                    servers: Vec::new(),
                })
                .collect(),
        };
        let merged = merge_seasons(vec![season(3, 1), season(1, 0), season(2, 2), season(3, 4)]);
        let found: Vec<(u32, usize)> = merged.iter().map(|s| (s.number, s.episodes.len())).collect();
        assert_eq!(found, vec![(2, 2), (3, 1)]);
    }

    #[test]
    fn test_reconstruction_is_idempotent() {
        let doc = Document::parse(fixtures::SERIES_DETAIL_EPISODE_LINKS);
        assert_eq!(plan_seasons(doc.root(), BASE), plan_seasons(doc.root(), BASE));
    }
}
