use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::server::{handlers, AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/leaderboard", get(handlers::get_leaderboard))
        .route("/api/csv", get(handlers::get_csv))
        .route("/api/health", get(handlers::health))
        .route("/api/refresh", post(handlers::trigger_refresh))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
