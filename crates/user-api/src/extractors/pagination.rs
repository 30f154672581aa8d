//! Pagination extractor
//!
//! Extracts page-based pagination parameters from query strings.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use user_service::ListUsersQuery;
use validator::Validate;

use crate::response::ApiError;

/// Validated pagination parameters, both starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        ListUsersQuery::default().into()
    }
}

impl From<ListUsersQuery> for Pagination {
    fn from(query: ListUsersQuery) -> Self {
        Self {
            page: query.page,
            limit: query.limit,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListUsersQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        params.validate()?;
        Ok(params.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> Result<Pagination, ApiError> {
        let (mut parts, ()) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Pagination::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_defaults() {
        let pagination = extract("/users").await.unwrap();
        assert_eq!(pagination, Pagination { page: 1, limit: 100_000 });
        assert_eq!(Pagination::default(), pagination);
    }

    #[tokio::test]
    async fn test_explicit_values() {
        let pagination = extract("/users?page=3&limit=25").await.unwrap();
        assert_eq!(pagination, Pagination { page: 3, limit: 25 });
    }

    #[tokio::test]
    async fn test_rejects_zero_and_garbage() {
        assert!(matches!(extract("/users?page=0").await, Err(ApiError::Validation(_))));
        assert!(matches!(extract("/users?limit=0").await, Err(ApiError::Validation(_))));
        assert!(matches!(extract("/users?page=abc").await, Err(ApiError::InvalidQuery(_))));
        assert!(matches!(extract("/users?limit=-5").await, Err(ApiError::InvalidQuery(_))));
    }
}
