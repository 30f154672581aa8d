//! Command implementations

pub mod cache;
pub mod migrate;
pub mod passwords;
pub mod seed;

use std::sync::Arc;

use tracing::info;
use user_common::AppConfig;
use user_db::{create_pool, DatabaseConfig, PgPool, PgUserRepository};
use user_service::ServiceContext;

use crate::error::CliError;

/// Password hash written by `seed` and, by default, `reset-passwords`.
/// It matches no password, so affected accounts must reset before logging in.
pub const TEMP_PASSWORD_MARKER: &str = "temp_password_needs_reset";

async fn connect_db(config: &AppConfig) -> Result<PgPool, CliError> {
    info!("Connecting to PostgreSQL...");
    create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| CliError::Database(e.to_string()))
}

/// Store and cache wired the same way as the server
async fn service_context(config: &AppConfig) -> Result<ServiceContext, CliError> {
    let pool = connect_db(config).await?;
    let cache = user_cache::connect_cache(config).await?;
    Ok(ServiceContext::new(Arc::new(PgUserRepository::new(pool)), cache))
}
