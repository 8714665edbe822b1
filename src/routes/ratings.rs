use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{CreateRatingRequest, Rating},
    routes::{
        extract::{AppJson, AppPath},
        AppState,
    },
    services::movies,
};

/// POST /api/ratings
pub async fn create(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<CreateRatingRequest>,
) -> AppResult<(StatusCode, Json<Rating>)> {
    tracing::info!(
        request_id = %request_id,
        movie_id = ?request.movie_id,
        scream = ?request.scream,
        psychological = ?request.psychological,
        suspense = ?request.suspense,
        "Rating submission received"
    );

    let rating = movies::add_rating(state.store.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

/// GET /api/movies/:id/ratings
pub async fn list(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = movies::list_ratings(state.store.as_ref(), id).await?;
    Ok(Json(ratings))
}
