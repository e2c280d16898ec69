pub mod api;
pub mod catalog;

pub use api::{EpisodeServersQuery, PageQuery, SearchQuery};
pub use catalog::{
    default_episode_title, Episode, HomeContent, MovieDetail, MovieSummary, RecentEpisode,
    SearchResult, Season, SeriesDetail, SeriesSummary, Server, DEFAULT_SERVER_NAME,
};
