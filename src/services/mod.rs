pub mod fetcher;
pub mod metrics;
pub mod scraper;
