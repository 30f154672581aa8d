//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

/// Default page size of the listing endpoint
pub const DEFAULT_LIST_LIMIT: u64 = 100_000;

// ============================================================================
// User Requests
// ============================================================================

/// Create user request.
///
/// `email` and `password` default to empty so a missing field is reported as
/// a validation error rather than a body parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Invalid email format")
    )]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,

    pub phone: Option<String>,

    pub avatar: Option<String>,

    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub birthdate: Option<String>,

    pub address: Option<String>,

    pub bio: Option<String>,
}

impl CreateUserRequest {
    /// Request with only the required fields set
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
            phone: None,
            avatar: None,
            birthdate: None,
            address: None,
            bio: None,
        }
    }
}

// ============================================================================
// Listing Query
// ============================================================================

/// Pagination for the user listing, both values starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be a positive integer"))]
    pub page: u64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be a positive integer"))]
    pub limit: u64,
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_LIST_LIMIT
}
