//! Bulk password hash replacement

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;
use user_common::{hash_password_blocking, AppConfig};
use user_core::UserRepository;

use super::{service_context, TEMP_PASSWORD_MARKER};
use crate::error::CliError;

/// Set the password hash of every user to `password_hash`.
///
/// Ids are walked in chunks of `chunk`, one chunk at a time. Within a chunk
/// at most `concurrency` updates are in flight, and the whole chunk finishes
/// before the next one is loaded. Returns the number of users updated.
pub async fn reset_passwords(
    repo: &dyn UserRepository,
    password_hash: &str,
    chunk: u64,
    concurrency: usize,
) -> Result<u64, CliError> {
    let total = repo.count().await?;
    let chunk = i64::try_from(chunk).unwrap_or(i64::MAX);
    let mut offset = 0_i64;
    let mut updated = 0_u64;

    while offset < total {
        let ids = repo.list_ids(offset, chunk).await?;
        if ids.is_empty() {
            break;
        }

        stream::iter(ids.iter().copied())
            .map(|id| repo.update_password(id, password_hash))
            .buffer_unordered(concurrency.max(1))
            .try_collect::<Vec<()>>()
            .await?;

        offset += ids.len() as i64;
        updated += ids.len() as u64;
        info!(updated, total, "Password reset progress");
    }

    Ok(updated)
}

/// `reset-passwords` command
pub async fn run(
    config: &AppConfig,
    chunk: u64,
    concurrency: usize,
    password: Option<String>,
) -> Result<(), CliError> {
    let password_hash = match password {
        Some(password) => hash_password_blocking(password).await?,
        None => TEMP_PASSWORD_MARKER.to_string(),
    };

    let ctx = service_context(config).await?;
    let updated = reset_passwords(ctx.user_repo(), &password_hash, chunk, concurrency).await?;
    info!(updated, "Password reset complete");

    ctx.cache().disconnect().await;
    Ok(())
}
