use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Movie, NewMovie, NewRating, Rating},
};

/// Data-access seam for movies and their ratings
///
/// Implemented by `PgMovieStore` for production and `InMemoryStore` for tests
/// and database-less local runs. Implementations must remove a movie's
/// ratings when the movie is deleted.
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    /// All movies, newest first
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>>;

    async fn get_movie_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Movie>>;

    /// Movies whose title contains `query`, case-insensitively
    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>>;

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie>;

    /// Deletes a movie and its ratings; `false` when it did not exist
    async fn delete_movie(&self, id: Uuid) -> AppResult<bool>;

    async fn insert_rating(&self, rating: NewRating) -> AppResult<Rating>;

    /// Ratings for one movie, newest first
    async fn list_ratings(&self, movie_id: Uuid) -> AppResult<Vec<Rating>>;

    /// Ratings for all of the given movies, in no particular order
    async fn list_ratings_for(&self, movie_ids: &[Uuid]) -> AppResult<Vec<Rating>>;
}
