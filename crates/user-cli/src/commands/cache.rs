//! Cache maintenance commands

use tracing::info;
use user_cache::connect_cache;
use user_common::AppConfig;

use crate::error::CliError;

/// Remove every key from the cache
pub async fn flush(config: &AppConfig) -> Result<(), CliError> {
    let cache = connect_cache(config).await?;
    cache.flush_all().await?;
    info!("Cache flushed");
    cache.disconnect().await;
    Ok(())
}

/// Print server statistics as pretty JSON
pub async fn stats(config: &AppConfig) -> Result<(), CliError> {
    let cache = connect_cache(config).await?;
    let stats = cache.stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    cache.disconnect().await;
    Ok(())
}
