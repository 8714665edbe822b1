use axum::{
    extract::State,
    Json,
};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::{HomeQuery, HomeSections},
    routes::{
        extract::AppQuery,
        AppState,
    },
    services::movies,
};

/// GET /api/home
pub async fn sections(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<HomeQuery>,
) -> AppResult<Json<HomeSections>> {
    let today = Utc::now().date_naive();
    let sections = movies::home_sections(state.store.as_ref(), &filter, today).await?;

    tracing::info!(
        upcoming = sections.upcoming.len(),
        recent = sections.recent.len(),
        highest_rated = sections.highest_rated.len(),
        classics = sections.classics.len(),
        "Home sections built"
    );

    Ok(Json(sections))
}
