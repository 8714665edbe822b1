use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Rating, ScoreAverages};
use crate::services::{
    providers::tmdb::{backdrop_url, poster_url, profile_url, youtube_embed_url, ImageSize},
    scoring::calculate_averages,
};

/// A catalog movie as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub tmdb_id: Option<i64>,
    pub imdb_id: Option<String>,
    pub title: String,
    pub year: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub tagline: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// YouTube video key
    pub trailer_key: Option<String>,
    /// Comma-delimited genre names, e.g. "Horror,Thriller"
    pub genres: Option<String>,
    pub director: Option<String>,
    /// JSON-serialized list of cast entries
    pub cast: Option<String>,
    pub tmdb_rating: Option<f64>,
    pub tmdb_votes: Option<i32>,
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Creates a movie from insert data with a fresh id and timestamps
    pub fn new(data: NewMovie) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tmdb_id: data.tmdb_id,
            imdb_id: data.imdb_id,
            title: data.title,
            year: data.year,
            release_date: data.release_date,
            description: data.description,
            tagline: data.tagline,
            runtime: data.runtime,
            poster_path: data.poster_path,
            backdrop_path: data.backdrop_path,
            trailer_key: data.trailer_key,
            genres: data.genres,
            director: data.director,
            cast: data.cast,
            tmdb_rating: data.tmdb_rating,
            tmdb_votes: data.tmdb_votes,
            imdb_rating: data.imdb_rating,
            imdb_votes: data.imdb_votes,
            created_at: now,
            updated_at: now,
        }
    }

    /// External rating used for ranking; missing ratings rank as zero
    pub fn external_rating(&self) -> f64 {
        self.imdb_rating.unwrap_or(0.0)
    }

    /// Normalized genre names: trimmed, lowercased, empties dropped
    pub fn genre_list(&self) -> Vec<String> {
        self.genres.as_deref().map(parse_genres).unwrap_or_default()
    }
}

/// Splits a comma-delimited genre string into normalized names
pub fn parse_genres(genres: &str) -> Vec<String> {
    genres
        .split(',')
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty())
        .collect()
}

/// Insert payload for a movie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewMovie {
    pub tmdb_id: Option<i64>,
    pub imdb_id: Option<String>,
    pub title: String,
    pub year: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub tagline: Option<String>,
    pub runtime: Option<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub trailer_key: Option<String>,
    pub genres: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub tmdb_rating: Option<f64>,
    pub tmdb_votes: Option<i32>,
    pub imdb_rating: Option<f64>,
    pub imdb_votes: Option<i32>,
}

/// Cast entry as serialized in `Movie::cast`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastEntry {
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Cast entry enriched with a profile image URL
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
    pub profile_url: Option<String>,
}

/// Parses the stored cast JSON; anything unparseable yields an empty list
pub fn parse_cast(cast_json: Option<&str>) -> Vec<CastMember> {
    let Some(json) = cast_json else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<CastEntry>>(json) {
        Ok(entries) => entries
            .into_iter()
            .map(|entry| CastMember {
                profile_url: profile_url(entry.profile_path.as_deref(), ImageSize::W185),
                name: entry.name,
                character: entry.character,
                profile_path: entry.profile_path,
            })
            .collect(),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unparseable cast JSON");
            Vec::new()
        }
    }
}

/// Movie as returned to clients, with ratings and derived fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    #[serde(flatten)]
    pub movie: Movie,
    pub ratings: Vec<Rating>,
    pub averages: ScoreAverages,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    pub parsed_cast: Vec<CastMember>,
}

impl MovieView {
    pub fn new(movie: Movie, ratings: Vec<Rating>) -> Self {
        Self {
            averages: calculate_averages(&ratings),
            poster_url: poster_url(movie.poster_path.as_deref(), ImageSize::W500),
            backdrop_url: backdrop_url(movie.backdrop_path.as_deref(), ImageSize::W1280),
            trailer_url: youtube_embed_url(movie.trailer_key.as_deref()),
            parsed_cast: parse_cast(movie.cast.as_deref()),
            ratings,
            movie,
        }
    }
}

/// Trimmed-down movie for the search dropdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: Uuid,
    pub title: String,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
}

impl From<&Movie> for MovieSummary {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            year: movie.year,
            poster_url: poster_url(movie.poster_path.as_deref(), ImageSize::W185),
        }
    }
}

/// Request body for POST /api/movies
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub tmdb_id: Option<i64>,
}
