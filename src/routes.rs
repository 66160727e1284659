use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{chat, health_check};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // Agent endpoint
        .route("/chat", post(chat))

        // Health check
        .route("/api/health", get(health_check))

        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
