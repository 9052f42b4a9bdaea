use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::CanonicalBook,
    services::{EngineStatus, RecommendationKind},
};

use super::AppState;

/// Default size of popular and recommendation lists
pub const DEFAULT_TOP: usize = 5;

/// Default size of search results
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

// Request types

/// `?top=` for list endpoints. Kept as text so that malformed values get the
/// JSON error body instead of the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub top: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<String>,
}

/// Parses a size parameter. Zero and negative values map to zero, which the
/// engine rejects as an invalid limit.
fn limit_or(name: &str, value: Option<&str>, default: usize) -> AppResult<usize> {
    let Some(raw) = value else {
        return Ok(default);
    };
    let parsed: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("{name} must be an integer, got {raw:?}")))?;
    Ok(usize::try_from(parsed).unwrap_or(0))
}

// Handlers

/// Service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the BookFlix catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "routes": [
            "/health",
            "/api/popular",
            "/api/correlation/{isbn}",
            "/api/content/{isbn}",
            "/api/search",
            "/api/books/{isbn}"
        ]
    }))
}

/// Health check endpoint. Reports 503 while the engine is degraded.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<EngineStatus>) {
    let status = state.engine.status();
    let code = match status {
        EngineStatus::Healthy { .. } => StatusCode::OK,
        EngineStatus::Degraded { .. } => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(status))
}

/// Most popular books
pub async fn popular(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<CanonicalBook>>> {
    let top = limit_or("top", params.top.as_deref(), DEFAULT_TOP)?;
    let books = state.engine.list_popular(top)?;

    tracing::debug!(request_id = %request_id, top, returned = books.len(), "Popular books");
    Ok(Json(books))
}

/// Correlation-based recommendations for one book
pub async fn correlation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(isbn): Path<String>,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<CanonicalBook>>> {
    recommend(state, request_id, RecommendationKind::Correlation, isbn, params)
}

/// Content-based recommendations for one book
pub async fn content(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(isbn): Path<String>,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<CanonicalBook>>> {
    recommend(state, request_id, RecommendationKind::Content, isbn, params)
}

fn recommend(
    state: AppState,
    request_id: RequestId,
    kind: RecommendationKind,
    isbn: String,
    params: TopParams,
) -> AppResult<Json<Vec<CanonicalBook>>> {
    let top = limit_or("top", params.top.as_deref(), DEFAULT_TOP)?;
    let books = state.engine.recommend(kind, &isbn, top)?;

    tracing::debug!(
        request_id = %request_id,
        kind = %kind,
        isbn = %isbn,
        top,
        returned = books.len(),
        "Recommendations"
    );
    Ok(Json(books))
}

/// Free-text search over title, author and ISBN
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<CanonicalBook>>> {
    let query = params
        .query
        .ok_or_else(|| AppError::InvalidInput("query parameter is required".to_string()))?;
    let limit = limit_or("limit", params.limit.as_deref(), DEFAULT_SEARCH_LIMIT)?;
    let books = state.engine.search(&query, limit)?;

    tracing::debug!(
        request_id = %request_id,
        query = %query,
        limit,
        returned = books.len(),
        "Search"
    );
    Ok(Json(books))
}

/// Single book by ISBN
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<CanonicalBook>> {
    let book = state.engine.get_book(&isbn)?;
    Ok(Json(book))
}
