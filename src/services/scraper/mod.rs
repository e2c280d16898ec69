//! Catalog Scraper
//!
//! Turns the streaming site's HTML pages into typed catalog records.
//!
//! # Overview
//!
//! The site's markup has changed several times, and old and new templates are
//! served side by side. Extraction is therefore driven by selector cascades:
//!
//! - **Normalizer**: absolute URLs, slugs, whitespace, numeric patterns
//! - **Cascades**: ordered selector lists per field, first matching template wins
//! - **Extractors**: cards, detail fields and servers with per-field fallbacks
//! - **Hierarchy**: seasons and episodes from containers, season pages or slugs
//! - **Catalog**: one orchestrator per page kind (home, listing, detail, search)
//!
//! # Slug inference
//!
//! Episode URLs usually end with the season and episode numbers:
//! ```text
//! https://site/episodio/the-wire-1x03/  →  season 1, episode 3
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::services::scraper::{Catalog, Lookup};
//!
//! let catalog = Catalog::new(fetcher, &config.base_url);
//! match catalog.series_detail("the-wire").await {
//!     Lookup::Found(series) => println!("{} seasons", series.seasons.len()),
//!     Lookup::NotFound => println!("no such series"),
//!     Lookup::Unavailable => println!("site unreachable"),
//! }
//! ```

pub mod cascade;
pub mod catalog;
pub mod classify;
pub mod dom;
pub mod extract;
pub mod hierarchy;
pub mod normalize;
pub mod selectors;
pub mod urls;

#[cfg(test)]
pub mod fixtures;

pub use catalog::{Catalog, Lookup};
