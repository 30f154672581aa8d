//! User entity - represents a user account and its read projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::UserId;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    Moderator,
    Support,
}

impl UserRole {
    /// Storage / wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
            Self::Moderator => "MODERATOR",
            Self::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            "MODERATOR" => Ok(Self::Moderator),
            "SUPPORT" => Ok(Self::Support),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
    PendingVerification,
}

impl UserStatus {
    /// Storage / wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::PendingVerification => "PENDING_VERIFICATION",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "SUSPENDED" => Ok(Self::Suspended),
            "PENDING_VERIFICATION" => Ok(Self::PendingVerification),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Unrecognised role or status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

/// User entity.
///
/// The password hash lives only in the store; it is passed to the repository
/// separately on insert and never loaded into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_email_verified: bool,
    pub birthdate: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Listing projection of this user
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            role: self.role,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Reduced view of a user served by the listing endpoint and stored in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// Data for a user that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub birthdate: Option<DateTime<Utc>>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_email_verified: bool,
    /// Backdated creation time; the store assigns the current time when unset
    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl NewUser {
    /// Create a new user with the default role, status and verification flag
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            phone: None,
            avatar: None,
            address: None,
            bio: None,
            birthdate: None,
            role: UserRole::User,
            status: UserStatus::Active,
            is_email_verified: false,
            created_at: None,
            last_login: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: UserId::new(1),
            email: "a@b.com".to_string(),
            name: Some("Alice".to_string()),
            phone: Some("555-0100".to_string()),
            avatar: None,
            address: None,
            bio: Some("hello".to_string()),
            role: UserRole::Admin,
            status: UserStatus::Active,
            is_email_verified: false,
            birthdate: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_user_defaults() {
        let user = NewUser::new("a@b.com");
        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.status, UserStatus::Active);
        assert!(!user.is_email_verified);
        assert!(user.name.is_none());
    }

    #[test]
    fn test_summary_projection() {
        let user = sample_user();
        let summary = user.summary();
        assert_eq!(summary.id, user.id);
        assert_eq!(summary.email, user.email);
        assert_eq!(summary.name, user.name);
        assert_eq!(summary.role, UserRole::Admin);
        assert_eq!(summary.created_at, user.created_at);
    }

    #[test]
    fn test_role_and_status_strings() {
        assert_eq!(UserRole::Moderator.to_string(), "MODERATOR");
        assert_eq!("SUPPORT".parse::<UserRole>().unwrap(), UserRole::Support);
        assert_eq!(
            "PENDING_VERIFICATION".parse::<UserStatus>().unwrap(),
            UserStatus::PendingVerification
        );
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_summary_wire_format() {
        let summary = sample_user().summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["status"], "ACTIVE");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("password").is_none());

        let back: UserSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
