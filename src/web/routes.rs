//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Dialog and aggregate search
        .route("/", get(handlers::index))
        .route("/search", get(handlers::search))
        // The endpoint shape the edit dialog consumes
        .route("/ajax/metadata/:provider/:book_id", get(handlers::metadata))
        .route("/ajax/form", post(handlers::apply_form))
        // API routes
        .route("/health", get(handlers::health))
        // Add middleware
        .layer(cors)
        // Add state
        .with_state(state)
}
