/// TMDB metadata provider
///
/// API Flow:
/// 1. Search: /search/movie → lightweight movie records for the add-movie picker
/// 2. Import: /movie/{id}, /movie/{id}/videos and /movie/{id}/credits fetched
///    concurrently and folded into a single insert payload
///
/// Responses are cached in Redis for an hour.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CastEntry, NewMovie, TmdbCredits, TmdbMovie, TmdbMovieDetails, TmdbSearchResponse,
        TmdbVideo, TmdbVideos,
    },
    services::providers::MetadataProvider,
};
use chrono::{Datelike, NaiveDate};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const TMDB_CACHE_TTL: u64 = 3600; // 1 hour
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed";
/// Cast members kept on import
const TOP_CAST: usize = 3;

/// TMDB image widths used by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W185,
    W500,
    W1280,
}

impl ImageSize {
    fn as_str(self) -> &'static str {
        match self {
            ImageSize::W185 => "w185",
            ImageSize::W500 => "w500",
            ImageSize::W1280 => "w1280",
        }
    }
}

fn image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}/{}{}", TMDB_IMAGE_BASE, size.as_str(), p))
}

pub fn poster_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    image_url(path, size)
}

pub fn backdrop_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    image_url(path, size)
}

pub fn profile_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    image_url(path, size)
}

pub fn youtube_embed_url(key: Option<&str>) -> Option<String> {
    key.filter(|k| !k.is_empty())
        .map(|k| format!("{}/{}", YOUTUBE_EMBED_BASE, k))
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_token: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_token: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// GET against the TMDB API with bearer auth
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, endpoint);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_movie_uncached(&self, tmdb_id: i64) -> AppResult<NewMovie> {
        let details_path = format!("/movie/{}", tmdb_id);
        let videos_path = format!("/movie/{}/videos", tmdb_id);
        let credits_path = format!("/movie/{}/credits", tmdb_id);
        let language = [("language", "en-US")];

        let (details, videos, credits) = tokio::try_join!(
            self.get_json::<TmdbMovieDetails>(&details_path, &language),
            self.get_json::<TmdbVideos>(&videos_path, &language),
            self.get_json::<TmdbCredits>(&credits_path, &language),
        )?;

        let movie = build_new_movie(details, &videos.results, &credits);

        tracing::info!(
            tmdb_id = tmdb_id,
            title = %movie.title,
            has_trailer = movie.trailer_key.is_some(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(movie)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Vec<TmdbMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MetadataSearch(query.to_string()),
            TMDB_CACHE_TTL,
            async move {
                let response: TmdbSearchResponse = self
                    .get_json(
                        "/search/movie",
                        &[
                            ("query", query),
                            ("include_adult", "false"),
                            ("language", "en-US"),
                            ("page", "1"),
                        ],
                    )
                    .await?;

                tracing::info!(
                    query = %query,
                    results = response.results.len(),
                    provider = "tmdb",
                    "Metadata search completed"
                );

                Ok::<_, AppError>(response.results)
            }
        )
    }

    async fn fetch_movie(&self, tmdb_id: i64) -> AppResult<NewMovie> {
        cached!(
            self.cache,
            CacheKey::MetadataMovie(tmdb_id),
            TMDB_CACHE_TTL,
            self.fetch_movie_uncached(tmdb_id)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

/// Official YouTube trailer, then any YouTube trailer, then any YouTube video
pub fn pick_trailer(videos: &[TmdbVideo]) -> Option<&TmdbVideo> {
    let youtube = |v: &&TmdbVideo| v.site == "YouTube";
    let trailer = |v: &&TmdbVideo| v.video_type == "Trailer";

    videos
        .iter()
        .filter(youtube)
        .find(|v| trailer(v) && v.official)
        .or_else(|| videos.iter().filter(youtube).find(trailer))
        .or_else(|| videos.iter().find(youtube))
}

/// Folds TMDB responses into an insert payload
pub fn build_new_movie(
    details: TmdbMovieDetails,
    videos: &[TmdbVideo],
    credits: &TmdbCredits,
) -> NewMovie {
    let release_date = details
        .release_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

    let genres = if details.genres.is_empty() {
        None
    } else {
        Some(
            details
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
        )
    };

    let director = credits
        .crew
        .iter()
        .find(|c| c.job.as_deref() == Some("Director"))
        .map(|c| c.name.clone());

    let cast: Vec<CastEntry> = credits
        .cast
        .iter()
        .take(TOP_CAST)
        .map(|c| CastEntry {
            name: c.name.clone(),
            character: c.character.clone().unwrap_or_default(),
            profile_path: c.profile_path.clone(),
        })
        .collect();
    let cast = if cast.is_empty() {
        None
    } else {
        serde_json::to_string(&cast).ok()
    };

    NewMovie {
        tmdb_id: Some(details.id),
        imdb_id: non_empty(details.imdb_id),
        title: details.title,
        year: release_date.map(|d| d.year()),
        release_date,
        description: non_empty(details.overview),
        tagline: non_empty(details.tagline),
        runtime: details.runtime.filter(|r| *r > 0),
        poster_path: details.poster_path,
        backdrop_path: details.backdrop_path,
        trailer_key: pick_trailer(videos).map(|v| v.key.clone()),
        genres,
        director,
        cast,
        tmdb_rating: details.vote_average,
        tmdb_votes: details.vote_count,
        imdb_rating: None,
        imdb_votes: None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
