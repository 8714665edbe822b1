use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::MovieStore,
    error::AppResult,
    models::{Movie, NewMovie, NewRating, Rating},
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const MOVIE_COLUMNS: &str = "id, tmdb_id, imdb_id, title, year, release_date, description, \
     tagline, runtime, poster_path, backdrop_path, trailer_key, genres, director, cast_json AS \"cast\", \
     tmdb_rating, tmdb_votes, imdb_rating, imdb_votes, created_at, updated_at";

const RATING_COLUMNS: &str =
    "id, movie_id, scream, psychological, suspense, review, author, created_at";

/// `MovieStore` over a Postgres pool
#[derive(Clone)]
pub struct PgMovieStore {
    pool: PgPool,
}

impl PgMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Escapes LIKE wildcards so user input matches literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait::async_trait]
impl MovieStore for PgMovieStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let sql = format!(
            "SELECT {} FROM movies ORDER BY created_at DESC",
            MOVIE_COLUMNS
        );
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn get_movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        let sql = format!("SELECT {} FROM movies WHERE id = $1", MOVIE_COLUMNS);
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn get_movie_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Movie>> {
        let sql = format!("SELECT {} FROM movies WHERE tmdb_id = $1", MOVIE_COLUMNS);
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(tmdb_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    async fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        let sql = format!(
            "SELECT {} FROM movies WHERE title ILIKE $1 ESCAPE '\\' ORDER BY created_at DESC",
            MOVIE_COLUMNS
        );
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .bind(like_pattern(query))
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let movie = Movie::new(movie);
        let sql = format!(
            r#"
            INSERT INTO movies (
                id, tmdb_id, imdb_id, title, year, release_date, description, tagline,
                runtime, poster_path, backdrop_path, trailer_key, genres, director, cast_json,
                tmdb_rating, tmdb_votes, imdb_rating, imdb_votes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21)
            RETURNING {}
            "#,
            MOVIE_COLUMNS
        );

        let inserted = sqlx::query_as::<_, Movie>(&sql)
            .bind(movie.id)
            .bind(movie.tmdb_id)
            .bind(&movie.imdb_id)
            .bind(&movie.title)
            .bind(movie.year)
            .bind(movie.release_date)
            .bind(&movie.description)
            .bind(&movie.tagline)
            .bind(movie.runtime)
            .bind(&movie.poster_path)
            .bind(&movie.backdrop_path)
            .bind(&movie.trailer_key)
            .bind(&movie.genres)
            .bind(&movie.director)
            .bind(&movie.cast)
            .bind(movie.tmdb_rating)
            .bind(movie.tmdb_votes)
            .bind(movie.imdb_rating)
            .bind(movie.imdb_votes)
            .bind(movie.created_at)
            .bind(movie.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(inserted)
    }

    async fn delete_movie(&self, id: Uuid) -> AppResult<bool> {
        // Ratings go with the movie through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_rating(&self, rating: NewRating) -> AppResult<Rating> {
        let rating = Rating::new(rating);
        let sql = format!(
            r#"
            INSERT INTO ratings (id, movie_id, scream, psychological, suspense, review, author, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            RATING_COLUMNS
        );

        let inserted = sqlx::query_as::<_, Rating>(&sql)
            .bind(rating.id)
            .bind(rating.movie_id)
            .bind(rating.scream)
            .bind(rating.psychological)
            .bind(rating.suspense)
            .bind(&rating.review)
            .bind(&rating.author)
            .bind(rating.created_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(inserted)
    }

    async fn list_ratings(&self, movie_id: Uuid) -> AppResult<Vec<Rating>> {
        let sql = format!(
            "SELECT {} FROM ratings WHERE movie_id = $1 ORDER BY created_at DESC",
            RATING_COLUMNS
        );
        let ratings = sqlx::query_as::<_, Rating>(&sql)
            .bind(movie_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ratings)
    }

    async fn list_ratings_for(&self, movie_ids: &[Uuid]) -> AppResult<Vec<Rating>> {
        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM ratings WHERE movie_id = ANY($1) ORDER BY created_at DESC",
            RATING_COLUMNS
        );
        let ratings = sqlx::query_as::<_, Rating>(&sql)
            .bind(movie_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(ratings)
    }
}
