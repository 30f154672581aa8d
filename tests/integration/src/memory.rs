//! In-process application over an in-memory store and cache

use std::sync::Arc;

use axum::Router;

use user_api::{create_app, AppState};
use user_cache::MemoryCache;
use user_common::AppConfig;
use user_service::ServiceContext;

pub use user_core::testing::InMemoryUserRepository;

/// Configuration for in-process apps; the database URL is never dialed
pub fn memory_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused@localhost/users".to_string()),
        "CACHE_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .expect("static test configuration is valid")
}

/// Full router plus handles on its store and cache
pub struct MemoryApp {
    pub router: Router,
    pub repo: Arc<InMemoryUserRepository>,
    pub cache: Arc<MemoryCache>,
}

impl MemoryApp {
    pub fn new() -> Self {
        let repo = InMemoryUserRepository::shared();
        let cache = Arc::new(MemoryCache::new());
        let context = ServiceContext::new(repo.clone(), cache.clone());
        let router = create_app(AppState::new(context, memory_config()));

        Self {
            router,
            repo,
            cache,
        }
    }
}

impl Default for MemoryApp {
    fn default() -> Self {
        Self::new()
    }
}
