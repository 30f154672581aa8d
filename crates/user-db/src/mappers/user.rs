//! User entity <-> model mapper

use chrono::{DateTime, Utc};
use user_core::entities::{NewUser, User, UserRole, UserStatus, UserSummary};
use user_core::error::DomainError;
use user_core::value_objects::UserId;

use crate::models::{UserModel, UserSummaryModel};

fn parse_role(raw: &str) -> Result<UserRole, DomainError> {
    raw.parse()
        .map_err(|e| DomainError::DatabaseError(format!("corrupt role column: {e}")))
}

fn parse_status(raw: &str) -> Result<UserStatus, DomainError> {
    raw.parse()
        .map_err(|e| DomainError::DatabaseError(format!("corrupt status column: {e}")))
}

/// Convert UserModel to User entity
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(model.id),
            role: parse_role(&model.role)?,
            status: parse_status(&model.status)?,
            email: model.email,
            name: model.name,
            phone: model.phone,
            avatar: model.avatar,
            address: model.address,
            bio: model.bio,
            is_email_verified: model.is_email_verified,
            birthdate: model.birthdate,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Convert UserSummaryModel to the UserSummary projection
impl TryFrom<UserSummaryModel> for UserSummary {
    type Error = DomainError;

    fn try_from(model: UserSummaryModel) -> Result<Self, Self::Error> {
        Ok(UserSummary {
            id: UserId::new(model.id),
            role: parse_role(&model.role)?,
            status: parse_status(&model.status)?,
            email: model.email,
            name: model.name,
            avatar: model.avatar,
            created_at: model.created_at,
        })
    }
}

/// Column-wise view of a batch of new users, bound as Postgres arrays and
/// expanded with `UNNEST` so one statement stays within the bind limit.
#[derive(Debug, Default)]
pub struct UserBatch {
    pub emails: Vec<String>,
    pub names: Vec<Option<String>>,
    pub phones: Vec<Option<String>>,
    pub avatars: Vec<Option<String>>,
    pub addresses: Vec<Option<String>>,
    pub bios: Vec<Option<String>>,
    pub roles: Vec<String>,
    pub statuses: Vec<String>,
    pub verified: Vec<bool>,
    pub birthdates: Vec<Option<DateTime<Utc>>>,
    pub last_logins: Vec<Option<DateTime<Utc>>>,
    pub created_at: Vec<DateTime<Utc>>,
}

impl UserBatch {
    pub fn new(users: &[NewUser], now: DateTime<Utc>) -> Self {
        let mut batch = Self::default();
        for user in users {
            batch.emails.push(user.email.clone());
            batch.names.push(user.name.clone());
            batch.phones.push(user.phone.clone());
            batch.avatars.push(user.avatar.clone());
            batch.addresses.push(user.address.clone());
            batch.bios.push(user.bio.clone());
            batch.roles.push(user.role.as_str().to_string());
            batch.statuses.push(user.status.as_str().to_string());
            batch.verified.push(user.is_email_verified);
            batch.birthdates.push(user.birthdate);
            batch.last_logins.push(user.last_login);
            batch.created_at.push(user.created_at.unwrap_or(now));
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
