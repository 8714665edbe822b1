use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{MovieSummary, TmdbMovie},
    routes::{
        extract::AppQuery,
        AppState,
    },
    services::movies,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
pub struct DropdownResponse {
    pub movies: Vec<MovieSummary>,
}

#[derive(Debug, Serialize)]
pub struct MetadataSearchResponse {
    pub results: Vec<TmdbMovie>,
}

/// GET /api/search: local catalog search for the dropdown
pub async fn dropdown(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<DropdownResponse>> {
    let movies = movies::search_dropdown(state.store.as_ref(), &params.q).await?;
    Ok(Json(DropdownResponse { movies }))
}

/// GET /api/tmdb/search: proxied metadata-provider search
pub async fn metadata(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<MetadataSearchResponse>> {
    let results = movies::search_metadata(state.metadata.as_ref(), &params.q).await?;
    Ok(Json(MetadataSearchResponse { results }))
}
