//! User service
//!
//! Handles user creation, lookup and the cached listing.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, instrument, warn};
use user_common::hash_password_blocking;
use user_core::{NewUser, UserId};
use validator::Validate;

use crate::dto::{CreateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::listing::{Listing, UserListingCache};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a user with the default role and status.
    ///
    /// The listing cache is invalidated afterwards; a failure there is logged
    /// and does not fail the request.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_user(&self, request: CreateUserRequest) -> ServiceResult<UserResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let CreateUserRequest {
            email,
            password,
            name,
            phone,
            avatar,
            birthdate,
            address,
            bio,
        } = request;

        let birthdate = birthdate.as_deref().map(parse_birthdate).transpose()?;
        let password_hash = hash_password_blocking(password).await?;

        let new_user = NewUser {
            name,
            phone,
            avatar,
            address,
            bio,
            birthdate,
            ..NewUser::new(email)
        };
        let user = self.ctx.user_repo().create(&new_user, &password_hash).await?;
        info!(user_id = %user.id, "User created");

        if let Err(err) = UserListingCache::new(self.ctx).invalidate().await {
            warn!(error = %err, "Failed to invalidate user listing cache");
        }

        Ok(UserResponse::from(&user))
    }

    /// Get a user by ID, `None` if it does not exist
    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, user_id: UserId) -> ServiceResult<Option<UserResponse>> {
        let user = self.ctx.user_repo().find_by_id(user_id).await?;
        Ok(user.map(UserResponse::from))
    }

    /// One page of user summaries through the read-through cache
    pub async fn get_all_users(&self, page: u64, limit: u64) -> ServiceResult<Listing> {
        UserListingCache::new(self.ctx).list_users(page, limit).await
    }

    /// Drop every cached listing page
    pub async fn invalidate_user_cache(&self) -> ServiceResult<u64> {
        UserListingCache::new(self.ctx).invalidate().await
    }
}

/// Parse a birthdate given as an RFC 3339 timestamp or a plain `YYYY-MM-DD` date
fn parse_birthdate(raw: &str) -> ServiceResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            ServiceError::validation(format!(
                "Invalid birthdate '{raw}', expected RFC 3339 or YYYY-MM-DD"
            ))
        })
}
