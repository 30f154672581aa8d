//! Read-through cache for the user listing
//!
//! Pages are served from the cache when present; misses are loaded from the
//! store and written back with a fixed TTL. A failing cache never fails a
//! read, it only turns the listing into a store read.
//!
//! A miss that overlaps an invalidation from the same process does not keep
//! its write-back: the rows it loaded may predate the write that triggered
//! the invalidation.

use std::sync::atomic::Ordering;

use serde::Serialize;
use tracing::{debug, instrument, warn};
use user_cache::{user_list_key, CacheExt, USER_LIST_PATTERN, USER_LIST_TTL};
use user_core::UserSummary;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Where a listing page was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    /// Cache hit, the store was not touched
    Cache,
    /// Cache miss, loaded from the store and written back
    Store,
    /// Cache unavailable or unreadable, loaded from the store without write-back
    Degraded,
}

/// One page of users and its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub users: Vec<UserSummary>,
    pub source: ListingSource,
}

/// Read-through listing cache
pub struct UserListingCache<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserListingCache<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List one page of users, `page` and `limit` both starting at 1.
    ///
    /// Concurrent cold reads of the same page each hit the store; they all
    /// return the same rows and the last write-back wins.
    #[instrument(skip(self))]
    pub async fn list_users(&self, page: u64, limit: u64) -> ServiceResult<Listing> {
        let key = user_list_key(page, limit);

        match self.ctx.cache().get::<Vec<UserSummary>>(&key).await {
            Ok(Some(users)) => {
                debug!(key = %key, count = users.len(), "Listing served from cache");
                Ok(Listing {
                    users,
                    source: ListingSource::Cache,
                })
            }
            Ok(None) => {
                let generation = self.generation();
                let users = self.load(page, limit).await?;
                self.write_back(&key, &users, generation).await;
                debug!(key = %key, count = users.len(), "Listing loaded from store");
                Ok(Listing {
                    users,
                    source: ListingSource::Store,
                })
            }
            Err(err) => {
                warn!(key = %key, error = %err, "Cache read failed, serving listing from store");
                let users = self.load(page, limit).await?;
                Ok(Listing {
                    users,
                    source: ListingSource::Degraded,
                })
            }
        }
    }

    /// Drop every cached listing page, returning how many were removed
    #[instrument(skip(self))]
    pub async fn invalidate(&self) -> ServiceResult<u64> {
        self.ctx.listing_generation().fetch_add(1, Ordering::SeqCst);

        let keys = self.ctx.cache().keys(USER_LIST_PATTERN).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let removed = self.ctx.cache().delete(&keys).await?;
        debug!(removed, "Listing cache invalidated");
        Ok(removed)
    }

    fn generation(&self) -> u64 {
        self.ctx.listing_generation().load(Ordering::SeqCst)
    }

    /// Cache a page loaded at `generation`, unless an invalidation has run
    /// since. One that lands between the write and the re-check is undone.
    async fn write_back(&self, key: &str, users: &[UserSummary], generation: u64) {
        if self.generation() != generation {
            debug!(key = %key, "Listing invalidated during load, skipping write-back");
            return;
        }

        if let Err(err) = self.ctx.cache().set(key, &users, Some(USER_LIST_TTL)).await {
            warn!(key = %key, error = %err, "Failed to write listing back to cache");
            return;
        }

        if self.generation() != generation {
            debug!(key = %key, "Listing invalidated during write-back, removing page");
            if let Err(err) = self.ctx.cache().delete(&[key.to_string()]).await {
                warn!(key = %key, error = %err, "Failed to remove stale listing");
            }
        }
    }

    async fn load(&self, page: u64, limit: u64) -> ServiceResult<Vec<UserSummary>> {
        let offset = page.saturating_sub(1).saturating_mul(limit);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        Ok(self.ctx.user_repo().list_summaries(offset, limit).await?)
    }
}
