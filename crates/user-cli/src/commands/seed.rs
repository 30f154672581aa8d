//! Bulk seeding of generated users

use chrono::Utc;
use tracing::{info, warn};
use user_common::AppConfig;
use user_core::UserRepository;
use user_service::UserListingCache;

use super::{service_context, TEMP_PASSWORD_MARKER};
use crate::error::CliError;
use crate::fake;

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub generated: u64,
    pub inserted: u64,
}

/// Generate and insert `total` users, `chunk` per statement.
///
/// Chunks run sequentially; generated emails that collide with existing
/// rows are skipped, so `inserted` can be lower than `generated`.
pub async fn seed_users(
    repo: &dyn UserRepository,
    total: u64,
    chunk: u64,
) -> Result<SeedReport, CliError> {
    let mut report = SeedReport {
        generated: 0,
        inserted: 0,
    };

    while report.generated < total {
        let size = chunk.min(total - report.generated);
        let users = fake::users(&mut rand::thread_rng(), size as usize, Utc::now());

        report.inserted += repo.insert_many(&users, TEMP_PASSWORD_MARKER).await?;
        report.generated += size;

        info!(
            generated = report.generated,
            inserted = report.inserted,
            total,
            "Seed progress"
        );
    }

    Ok(report)
}

/// `seed` command
pub async fn run(config: &AppConfig, total: u64, chunk: u64) -> Result<(), CliError> {
    let ctx = service_context(config).await?;

    let report = seed_users(ctx.user_repo(), total, chunk).await?;
    info!(
        generated = report.generated,
        inserted = report.inserted,
        "Seeding complete"
    );

    match UserListingCache::new(&ctx).invalidate().await {
        Ok(removed) => info!(removed, "Listing cache invalidated"),
        Err(e) => warn!(error = %e, "Failed to invalidate listing cache"),
    }
    ctx.cache().disconnect().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_core::testing::InMemoryUserRepository;

    #[tokio::test]
    async fn test_seed_runs_in_chunks() {
        let repo = InMemoryUserRepository::default();

        let report = seed_users(&repo, 25, 10).await.unwrap();

        assert_eq!(report.generated, 25);
        assert_eq!(repo.batch_sizes(), vec![10, 10, 5]);
        assert_eq!(report.inserted, repo.len() as u64);
        assert!(repo.hashes().iter().all(|h| h == TEMP_PASSWORD_MARKER));
    }

    #[tokio::test]
    async fn test_seed_nothing() {
        let repo = InMemoryUserRepository::default();
        let report = seed_users(&repo, 0, 10).await.unwrap();
        assert_eq!(report, SeedReport { generated: 0, inserted: 0 });
        assert!(repo.batch_sizes().is_empty());
    }
}
