use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog lookup
        .route("/movies/:title", get(handlers::get_movies))
        .route("/movies/:title/:field", get(handlers::get_movie_field))
        // Recommendations
        .route("/recommendations/id/:id", get(handlers::recommend_by_id))
        .route("/recommendations/:title", get(handlers::recommend_by_title))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}
