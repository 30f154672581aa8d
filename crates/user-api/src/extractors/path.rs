//! Path parameter extractors
//!
//! Type-safe extraction of user IDs from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use user_core::UserId;

use crate::response::ApiError;

/// Path extractor whose rejection is an [`ApiError`]
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(inner) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(ApiPath(inner))
    }
}

/// Path parameters with the user id
#[derive(Debug, serde::Deserialize)]
pub struct UserIdPath {
    pub id: String,
}

impl UserIdPath {
    /// Parse the id as a UserId
    pub fn user_id(&self) -> Result<UserId, ApiError> {
        self.id
            .parse()
            .map_err(|_| ApiError::invalid_path(format!("Invalid user id '{}'", self.id)))
    }
}
