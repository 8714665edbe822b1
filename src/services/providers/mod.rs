/// Movie metadata provider abstraction
///
/// The catalog is enriched from a third-party metadata source. Handlers only
/// see this trait, so the HTTP client can be swapped for a mock in tests.
use crate::{
    error::AppResult,
    models::{NewMovie, TmdbMovie},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search the provider's catalog by title
    async fn search_movies(&self, query: &str) -> AppResult<Vec<TmdbMovie>>;

    /// Fetch everything needed to insert a movie: details, trailer, credits
    async fn fetch_movie(&self, tmdb_id: i64) -> AppResult<NewMovie>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
