//! Backend selection from application configuration

use std::sync::Arc;
use tracing::{info, warn};
use user_common::{AppConfig, CacheBackend};

use super::memory::MemoryCache;
use super::redis_client::RedisCacheClient;
use super::service::CacheService;
use crate::error::CacheResult;

/// Build the cache backend named by `CACHE_BACKEND`.
///
/// The Redis client is connected eagerly, but an unreachable server is only
/// logged: the first operation retries the connect, and until then readers
/// fall back to the store.
pub async fn connect_cache(config: &AppConfig) -> CacheResult<Arc<dyn CacheService>> {
    match config.cache.backend {
        CacheBackend::Redis => {
            let client = RedisCacheClient::from_config(&config.redis)?;
            match client.connect().await {
                Ok(()) => info!("Redis connection established"),
                Err(e) => warn!(error = %e, "Redis unavailable at startup"),
            }
            Ok(Arc::new(client))
        }
        CacheBackend::Memory => {
            info!("Using in-process memory cache");
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}
