use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    db::MovieStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::providers::MetadataProvider,
};

pub mod extract;
pub mod home;
pub mod movies;
pub mod ratings;
pub mod search;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MovieStore>,
    pub metadata: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(store: Arc<dyn MovieStore>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self { store, metadata }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(from_fn(request_id_middleware))
        .layer(cors)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(movies::list).post(movies::create))
        .route("/movies/:id", get(movies::get).delete(movies::delete))
        .route("/movies/:id/ratings", get(ratings::list))
        .route("/movies/:id/similar", get(movies::similar))
        .route("/ratings", post(ratings::create))
        .route("/search", get(search::dropdown))
        .route("/tmdb/search", get(search::metadata))
        .route("/home", get(home::sections))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
