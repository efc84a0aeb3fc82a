use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{MovieField, MovieSummary, UnknownField};
use crate::recommender::{BackendKind, Recommendation};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub movies: usize,
    pub backend: BackendKind,
    pub built_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FieldResponse {
    pub title: String,
    pub field: MovieField,
    pub value: Value,
}

#[derive(Debug, Serialize)]
pub struct TitleRecommendationsResponse {
    pub title: String,
    pub backend: BackendKind,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct IdRecommendationsResponse {
    pub id: i64,
    pub title: String,
    pub backend: BackendKind,
    pub recommendations: Vec<Recommendation>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let recommender = state.recommender().await;
    Json(HealthResponse {
        status: "healthy",
        movies: recommender.catalog().len(),
        backend: recommender.kind(),
        built_at: recommender.built_at(),
    })
}

/// Every movie whose title matches
pub async fn get_movies(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let recommender = state.recommender().await;
    let catalog = recommender.catalog();

    let movies: Vec<MovieSummary> = catalog
        .find_by_title(&title)
        .iter()
        .filter_map(|&row| catalog.movie(row))
        .map(MovieSummary::from)
        .collect();

    if movies.is_empty() {
        return Err(title_not_found(&title));
    }
    Ok(Json(movies))
}

/// A single field of the first movie matching the title
pub async fn get_movie_field(
    State(state): State<AppState>,
    Path((title, field)): Path<(String, String)>,
) -> AppResult<Json<FieldResponse>> {
    let field: MovieField = field
        .parse()
        .map_err(|e: UnknownField| AppError::InvalidInput(e.to_string()))?;

    let recommender = state.recommender().await;
    let catalog = recommender.catalog();
    let movie = catalog
        .resolve_title(&title)
        .and_then(|row| catalog.movie(row))
        .ok_or_else(|| title_not_found(&title))?;

    Ok(Json(FieldResponse {
        title: movie.title.clone(),
        field,
        value: field.read(movie),
    }))
}

/// Recommended titles for the movie matching `title`
pub async fn recommend_by_title(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(title): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<TitleRecommendationsResponse>> {
    let top_n = state.limits.resolve(query.top_n)?;
    let recommender = state.recommender().await;
    let catalog = recommender.catalog();

    let row = catalog
        .resolve_title(&title)
        .ok_or_else(|| title_not_found(&title))?;
    let recommendations = recommender.recommend(row, top_n)?;

    tracing::info!(
        request_id = %request_id,
        row,
        top_n,
        returned = recommendations.len(),
        "Recommendations served"
    );

    Ok(Json(TitleRecommendationsResponse {
        title: catalog
            .movie(row)
            .map(|movie| movie.title.clone())
            .unwrap_or(title),
        backend: recommender.kind(),
        recommendations,
    }))
}

/// Scored recommendations for the movie with the given id
pub async fn recommend_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<IdRecommendationsResponse>> {
    let top_n = state.limits.resolve(query.top_n)?;
    let recommender = state.recommender().await;

    let recommendations = recommender.recommend_by_id(id, top_n)?;
    let title = recommender
        .catalog()
        .row_of(id)
        .and_then(|row| recommender.catalog().movie(row))
        .map(|movie| movie.title.clone())
        .unwrap_or_default();

    Ok(Json(IdRecommendationsResponse {
        id,
        title,
        backend: recommender.kind(),
        recommendations,
    }))
}

fn title_not_found(title: &str) -> AppError {
    AppError::NotFound(format!("No movie titled '{}'", title))
}
