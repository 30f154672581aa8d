//! Route definitions

use axum::{routing::get, Router};

use crate::handlers::{health, users};
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new().merge(user_routes()).merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/cache", get(health::cache_health))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user))
}
