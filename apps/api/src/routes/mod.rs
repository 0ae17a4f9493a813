pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::imaging::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Image generation
        .route(
            "/api/generate-images",
            post(handlers::handle_generate_images),
        )
        .with_state(state)
}
