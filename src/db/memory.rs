use std::collections::HashSet;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{Movie, NewMovie, NewRating, Rating},
};

/// Process-local store backed by vectors behind a lock
///
/// Rows are kept in insertion order, so "newest first" is reverse insertion
/// order regardless of timestamp resolution.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<InMemoryStoreInner>,
}

#[derive(Default)]
struct InMemoryStoreInner {
    movies: Vec<Movie>,
    ratings: Vec<Rating>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MovieStore for InMemoryStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.iter().rev().cloned().collect())
    }

    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn get_movie_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner
            .movies
            .iter()
            .find(|m| m.tmdb_id == Some(tmdb_id))
            .cloned())
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        let needle = query.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .movies
            .iter()
            .rev()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let movie = Movie::new(movie);
        let mut inner = self.inner.write().await;
        inner.movies.push(movie.clone());
        Ok(movie)
    }

    async fn delete_movie(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.movies.len();
        inner.movies.retain(|m| m.id != id);
        if inner.movies.len() == before {
            return Ok(false);
        }
        inner.ratings.retain(|r| r.movie_id != id);
        Ok(true)
    }

    async fn insert_rating(&self, rating: NewRating) -> AppResult<Rating> {
        let rating = Rating::new(rating);
        let mut inner = self.inner.write().await;
        inner.ratings.push(rating.clone());
        Ok(rating)
    }

    async fn list_ratings(&self, movie_id: Uuid) -> AppResult<Vec<Rating>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .rev()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect())
    }

    async fn list_ratings_for(&self, movie_ids: &[Uuid]) -> AppResult<Vec<Rating>> {
        let ids: HashSet<&Uuid> = movie_ids.iter().collect();
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .rev()
            .filter(|r| ids.contains(&r.movie_id))
            .cloned()
            .collect())
    }
}
