//! Health check handlers
//!
//! Endpoints for liveness and readiness probes, plus cache statistics.

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;
use user_cache::CacheStats;
use user_service::dto::{CacheHealthResponse, HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Readiness check with dependency health
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();

    let (db, cache_healthy) = tokio::join!(ctx.user_repo().health_check(), ctx.cache().health_check());
    let db_healthy = db.is_ok();

    let response = ReadinessResponse::ready(db_healthy, cache_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Cache statistics and connection state
///
/// GET /health/cache
pub async fn cache_health(State(state): State<AppState>) -> (StatusCode, Json<CacheHealthResponse>) {
    let cache = state.service_context().cache();
    let connection = cache.status();

    match cache.stats().await {
        Ok(stats) => (StatusCode::OK, Json(CacheHealthResponse { connection, stats })),
        Err(err) => {
            warn!(error = %err, "Cache statistics unavailable");
            let stats = CacheStats::default();
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(CacheHealthResponse { connection, stats }),
            )
        }
    }
}
