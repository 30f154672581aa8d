//! User handlers
//!
//! Endpoints for creating, listing and fetching users.

use axum::{
    extract::State,
    http::{header::HeaderName, HeaderValue},
    response::IntoResponse,
    Json,
};
use user_service::{CreateUserRequest, ListingSource, ServiceError, UserResponse, UserService};

use crate::extractors::{ApiPath, Pagination, UserIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Header reporting how the listing was served
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// `X-Cache` value for a listing source
pub fn cache_header(source: ListingSource) -> HeaderValue {
    HeaderValue::from_static(match source {
        ListingSource::Cache => "HIT",
        ListingSource::Store => "MISS",
        ListingSource::Degraded => "BYPASS",
    })
}

/// List users
///
/// GET /users?page=&limit=
pub async fn list_users(
    State(state): State<AppState>,
    pagination: Pagination,
) -> ApiResult<impl IntoResponse> {
    let service = UserService::new(state.service_context());
    let listing = service.get_all_users(pagination.page, pagination.limit).await?;
    Ok(([(X_CACHE, cache_header(listing.source))], Json(listing.users)))
}

/// Create a user
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.create_user(request).await?;
    Ok(Created(Json(response)))
}

/// Get user by ID
///
/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<UserIdPath>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = path.user_id()?;

    let service = UserService::new(state.service_context());
    let response = service
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;
    Ok(Json(response))
}
