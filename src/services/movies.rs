use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    db::MovieStore,
    error::{AppError, AppResult},
    models::{
        CreateMovieRequest, CreateRatingRequest, HomeSections, Movie, MovieFilter, MovieSummary,
        MovieView, NewMovie, NewRating, Rating, TmdbMovie, DEFAULT_AUTHOR,
        rating::{MAX_SCORE, MIN_SCORE},
    },
    services::{
        catalog::build_home_sections,
        providers::MetadataProvider,
        similar::{select_similar, MAX_SIMILAR_LIMIT},
    },
};

/// Results shown in the search dropdown
pub const DROPDOWN_LIMIT: usize = 8;
/// Results returned by the metadata search proxy
pub const METADATA_SEARCH_LIMIT: usize = 10;
/// Longest query forwarded to the metadata provider, in characters
pub const MAX_METADATA_QUERY_CHARS: usize = 100;

/// Attaches ratings to each movie, preserving movie order
async fn with_ratings(store: &dyn MovieStore, movies: Vec<Movie>) -> AppResult<Vec<MovieView>> {
    let ids: Vec<Uuid> = movies.iter().map(|m| m.id).collect();
    let mut by_movie: HashMap<Uuid, Vec<Rating>> = HashMap::new();
    for rating in store.list_ratings_for(&ids).await? {
        by_movie.entry(rating.movie_id).or_default().push(rating);
    }

    Ok(movies
        .into_iter()
        .map(|movie| {
            let ratings = by_movie.remove(&movie.id).unwrap_or_default();
            MovieView::new(movie, ratings)
        })
        .collect())
}

/// Catalog listing, newest first, optionally narrowed by title and filter
pub async fn list_movies(
    store: &dyn MovieStore,
    title_query: Option<&str>,
    filter: &MovieFilter,
) -> AppResult<Vec<MovieView>> {
    let movies = match title_query {
        Some(q) => store.search_movies(q).await?,
        None => store.list_movies().await?,
    };

    let movies: Vec<Movie> = movies.into_iter().filter(|m| filter.matches(m)).collect();
    with_ratings(store, movies).await
}

pub async fn get_movie(store: &dyn MovieStore, id: Uuid) -> AppResult<MovieView> {
    let movie = store
        .get_movie(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;
    let ratings = store.list_ratings(id).await?;
    Ok(MovieView::new(movie, ratings))
}

/// Creates a movie by hand, or imports it when a TMDB id is given
pub async fn create_movie(
    store: &dyn MovieStore,
    provider: &dyn MetadataProvider,
    request: CreateMovieRequest,
) -> AppResult<MovieView> {
    if let Some(tmdb_id) = request.tmdb_id {
        return import_movie(store, provider, tmdb_id).await;
    }

    let title = request
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Title is required".to_string()))?;

    let movie = store
        .insert_movie(NewMovie {
            title: title.to_string(),
            year: request.year,
            description: request
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            ..Default::default()
        })
        .await?;

    tracing::info!(movie_id = %movie.id, title = %movie.title, "Movie created");
    Ok(MovieView::new(movie, Vec::new()))
}

/// Imports a movie from the metadata provider, idempotent on the TMDB id
pub async fn import_movie(
    store: &dyn MovieStore,
    provider: &dyn MetadataProvider,
    tmdb_id: i64,
) -> AppResult<MovieView> {
    if let Some(existing) = store.get_movie_by_tmdb_id(tmdb_id).await? {
        tracing::info!(tmdb_id = tmdb_id, movie_id = %existing.id, "Movie already imported");
        let ratings = store.list_ratings(existing.id).await?;
        return Ok(MovieView::new(existing, ratings));
    }

    let mut data = provider.fetch_movie(tmdb_id).await?;
    data.tmdb_id = Some(tmdb_id);
    let movie = store.insert_movie(data).await?;

    tracing::info!(
        tmdb_id = tmdb_id,
        movie_id = %movie.id,
        provider = provider.name(),
        "Movie imported"
    );
    Ok(MovieView::new(movie, Vec::new()))
}

pub async fn delete_movie(store: &dyn MovieStore, id: Uuid) -> AppResult<()> {
    if !store.delete_movie(id).await? {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }
    tracing::info!(movie_id = %id, "Movie deleted");
    Ok(())
}

/// Validates a rating submission into an insert payload
///
/// Checks run in order: movie id, presence of all three sub-scores, range.
pub fn validate_rating(request: CreateRatingRequest) -> AppResult<NewRating> {
    let movie_id = request
        .movie_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Movie ID is required".to_string()))?;
    let movie_id = Uuid::parse_str(movie_id)
        .map_err(|_| AppError::InvalidInput("Movie ID is invalid".to_string()))?;

    let (Some(scream), Some(psychological), Some(suspense)) =
        (request.scream, request.psychological, request.suspense)
    else {
        return Err(AppError::InvalidInput(
            "All rating values are required".to_string(),
        ));
    };

    let in_range = |v: f64| (MIN_SCORE..=MAX_SCORE).contains(&v);
    if !(in_range(scream) && in_range(psychological) && in_range(suspense)) {
        return Err(AppError::InvalidInput(
            "Rating values must be between 1 and 100".to_string(),
        ));
    }

    let review = request
        .review
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    let author = request
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_AUTHOR)
        .to_string();

    Ok(NewRating {
        movie_id,
        scream: scream.round() as i32,
        psychological: psychological.round() as i32,
        suspense: suspense.round() as i32,
        review,
        author,
    })
}

/// Validates and stores a rating; the movie must exist
pub async fn add_rating(store: &dyn MovieStore, request: CreateRatingRequest) -> AppResult<Rating> {
    let rating = validate_rating(request)?;

    if store.get_movie(rating.movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    let rating = store.insert_rating(rating).await?;
    tracing::info!(rating_id = %rating.id, movie_id = %rating.movie_id, "Rating created");
    Ok(rating)
}

pub async fn list_ratings(store: &dyn MovieStore, movie_id: Uuid) -> AppResult<Vec<Rating>> {
    if store.get_movie(movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }
    store.list_ratings(movie_id).await
}

/// Sidebar of movies similar to `id`
pub async fn similar_movies(
    store: &dyn MovieStore,
    id: Uuid,
    limit: usize,
) -> AppResult<Vec<MovieView>> {
    let subject = store
        .get_movie(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let catalog = store.list_movies().await?;
    let selected: Vec<Movie> = select_similar(
        subject.genres.as_deref(),
        subject.id,
        &catalog,
        limit.min(MAX_SIMILAR_LIMIT),
    )
    .into_iter()
    .cloned()
    .collect();

    with_ratings(store, selected).await
}

/// Local title search for the dropdown; a blank query yields nothing
pub async fn search_dropdown(store: &dyn MovieStore, query: &str) -> AppResult<Vec<MovieSummary>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let movies = store.search_movies(query).await?;
    Ok(movies
        .iter()
        .take(DROPDOWN_LIMIT)
        .map(MovieSummary::from)
        .collect())
}

/// Proxied metadata-provider search; a blank query yields nothing
pub async fn search_metadata(
    provider: &dyn MetadataProvider,
    query: &str,
) -> AppResult<Vec<TmdbMovie>> {
    let query: String = query.trim().chars().take(MAX_METADATA_QUERY_CHARS).collect();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let mut results = provider.search_movies(&query).await?;
    results.truncate(METADATA_SEARCH_LIMIT);
    Ok(results)
}

/// Homepage carousels as of `today`
pub async fn home_sections(
    store: &dyn MovieStore,
    filter: &MovieFilter,
    today: NaiveDate,
) -> AppResult<HomeSections> {
    let movies = store.list_movies().await?;
    let views = with_ratings(store, movies).await?;
    Ok(build_home_sections(views, filter, today))
}
