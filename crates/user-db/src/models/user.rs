//! User database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Full row of the users table, minus the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub status: String,
    pub is_email_verified: bool,
    pub birthdate: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection of the users table
#[derive(Debug, Clone, FromRow)]
pub struct UserSummaryModel {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
