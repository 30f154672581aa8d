//! Service context - dependency container for services
//!
//! Holds the user store and the cache client handed to every service.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use user_cache::CacheService;
use user_core::UserRepository;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies.
///
/// Built once at startup and cloned cheaply into handlers; the cache client
/// is shared through it instead of living in a global.
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheService>,
    /// Bumped by every listing invalidation; shared by all clones
    listing_generation: Arc<AtomicU64>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(user_repo: Arc<dyn UserRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            user_repo,
            cache,
            listing_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the cache client
    pub fn cache(&self) -> &dyn CacheService {
        self.cache.as_ref()
    }

    /// Shared handle to the cache client
    pub fn cache_handle(&self) -> Arc<dyn CacheService> {
        Arc::clone(&self.cache)
    }

    pub(crate) fn listing_generation(&self) -> &AtomicU64 {
        &self.listing_generation
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("user_repo", &"dyn UserRepository")
            .field("cache", &self.cache.status())
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    cache: Option<Arc<dyn CacheService>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn CacheService>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.cache
                .ok_or_else(|| ServiceError::validation("cache is required"))?,
        ))
    }
}
