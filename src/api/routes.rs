use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            // Request IDs are assigned before the trace span is opened
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// Catalog routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/popular", get(handlers::popular))
        .route("/correlation/:isbn", get(handlers::correlation))
        .route("/content/:isbn", get(handlers::content))
        .route("/search", get(handlers::search))
        .route("/books/:isbn", get(handlers::get_book))
}
