//! Middleware stack for the API server
//!
//! Every request gets an `x-request-id` (generated unless the client sent
//! one), a tracing span carrying that id, a 30 second deadline and CORS
//! headers.

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};
use user_common::CorsConfig;

use crate::handlers::users::X_CACHE;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const X_REQUEST_ID: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

/// Upper bound on the time spent serving one request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the middleware stack to the router
pub fn apply_middleware<S>(router: Router<S>, cors_config: &CorsConfig, is_production: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Last added runs first: set id, propagate id, trace, timeout, CORS
    router
        .layer(create_cors_layer(cors_config, is_production))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, X_REQUEST_ID])
        .expose_headers([X_REQUEST_ID, X_CACHE])
        .allow_origin(allowed_origins(&config.allowed_origins, is_production))
}

/// Origins allowed to read responses.
///
/// Configured origins always win. Without any, development accepts every
/// origin and production accepts none.
fn allowed_origins(configured: &[String], is_production: bool) -> AllowOrigin {
    if configured.is_empty() {
        if is_production {
            tracing::warn!("CORS: no allowed origins configured, browsers will be blocked");
            return AllowOrigin::list(Vec::<HeaderValue>::new());
        }
        tracing::debug!("CORS: allowing any origin");
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    tracing::info!(count = origins.len(), "CORS: allowing configured origins");
    AllowOrigin::list(origins)
}
