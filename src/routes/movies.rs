use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{CreateMovieRequest, MovieView, SearchQuery},
    routes::{
        extract::{AppJson, AppPath, AppQuery},
        AppState,
    },
    services::{movies, similar::DEFAULT_SIMILAR_LIMIT},
};

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub limit: Option<usize>,
}

/// GET /api/movies
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> AppResult<Json<Vec<MovieView>>> {
    let movies = movies::list_movies(state.store.as_ref(), query.title_query(), &query.filter())
        .await?;
    Ok(Json(movies))
}

/// POST /api/movies
pub async fn create(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<MovieView>)> {
    tracing::info!(
        request_id = %request_id,
        tmdb_id = ?request.tmdb_id,
        "Processing add-movie request"
    );

    let movie =
        movies::create_movie(state.store.as_ref(), state.metadata.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

/// GET /api/movies/:id
pub async fn get(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<MovieView>> {
    let movie = movies::get_movie(state.store.as_ref(), id).await?;
    Ok(Json(movie))
}

/// DELETE /api/movies/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    tracing::info!(request_id = %request_id, movie_id = %id, "Deleting movie");
    movies::delete_movie(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/movies/:id/similar
pub async fn similar(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppQuery(query): AppQuery<SimilarQuery>,
) -> AppResult<Json<Vec<MovieView>>> {
    let limit = query.limit.unwrap_or(DEFAULT_SIMILAR_LIMIT);
    let movies = movies::similar_movies(state.store.as_ref(), id, limit).await?;
    Ok(Json(movies))
}
