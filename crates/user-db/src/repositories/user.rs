//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use user_core::entities::{NewUser, User, UserSummary};
use user_core::error::DomainError;
use user_core::traits::{RepoResult, UserRepository};
use user_core::value_objects::UserId;

use crate::mappers::UserBatch;
use crate::models::{UserModel, UserSummaryModel};

use super::error::{map_db_error, map_unique_violation, user_not_found};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, email, name, phone, avatar, address, bio, role, status,
                   is_email_verified, birthdate, last_login, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_summaries(&self, offset: i64, limit: i64) -> RepoResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryModel>(
            r"
            SELECT id, email, name, avatar, role, status, created_at
            FROM users
            ORDER BY id
            OFFSET $1
            LIMIT $2
            ",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(UserSummary::try_from).collect()
    }

    #[instrument(skip(self, user, password_hash), fields(email = %user.email))]
    async fn create(&self, user: &NewUser, password_hash: &str) -> RepoResult<User> {
        let model = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (email, password_hash, name, phone, avatar, address, bio,
                               role, status, is_email_verified, birthdate, last_login, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, COALESCE($13, NOW()))
            RETURNING id, email, name, phone, avatar, address, bio, role, status,
                      is_email_verified, birthdate, last_login, created_at, updated_at
            ",
        )
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.avatar)
        .bind(&user.address)
        .bind(&user.bio)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.is_email_verified)
        .bind(user.birthdate)
        .bind(user.last_login)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        User::try_from(model)
    }

    #[instrument(skip(self, users, password_hash), fields(batch = users.len()))]
    async fn insert_many(&self, users: &[NewUser], password_hash: &str) -> RepoResult<u64> {
        let batch = UserBatch::new(users, Utc::now());
        if batch.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r"
            INSERT INTO users (email, password_hash, name, phone, avatar, address, bio,
                               role, status, is_email_verified, birthdate, last_login, created_at)
            SELECT email, $2, name, phone, avatar, address, bio,
                   role, status, is_email_verified, birthdate, last_login, created_at
            FROM UNNEST(
                $1::TEXT[], $3::TEXT[], $4::TEXT[], $5::TEXT[], $6::TEXT[], $7::TEXT[],
                $8::TEXT[], $9::TEXT[], $10::BOOLEAN[], $11::TIMESTAMPTZ[], $12::TIMESTAMPTZ[],
                $13::TIMESTAMPTZ[]
            ) AS t(email, name, phone, avatar, address, bio,
                   role, status, is_email_verified, birthdate, last_login, created_at)
            ON CONFLICT (email) DO NOTHING
            ",
        )
        .bind(&batch.emails)
        .bind(password_hash)
        .bind(&batch.names)
        .bind(&batch.phones)
        .bind(&batch.avatars)
        .bind(&batch.addresses)
        .bind(&batch.bios)
        .bind(&batch.roles)
        .bind(&batch.statuses)
        .bind(&batch.verified)
        .bind(&batch.birthdates)
        .bind(&batch.last_logins)
        .bind(&batch.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_ids(&self, offset: i64, limit: i64) -> RepoResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r"
            SELECT id FROM users
            ORDER BY id
            OFFSET $1
            LIMIT $2
            ",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: UserId, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgUserRepository>();
    }
}
