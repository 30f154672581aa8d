use thiserror::Error;
use user_cache::CacheError;
use user_common::{AppError, ConfigError};
use user_core::DomainError;
use user_service::ServiceError;

/// Failure of a CLI command
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
