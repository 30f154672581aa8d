//! Database migration command

use tracing::info;
use user_common::AppConfig;
use user_db::run_migrations;

use super::connect_db;
use crate::error::CliError;

/// Apply every pending migration
pub async fn run(config: &AppConfig) -> Result<(), CliError> {
    let pool = connect_db(config).await?;

    info!("Running migrations...");
    run_migrations(&pool)
        .await
        .map_err(|e| CliError::Migration(e.to_string()))?;

    info!("Migrations complete");
    Ok(())
}
