//! Cache service trait for abstracted caching operations.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::connection::ConnectionStatus;
use crate::error::{CacheError, CacheResult};
use crate::info::CacheStats;

/// Cache backend operating on raw string values.
///
/// Object safe so callers can hold an `Arc<dyn CacheService>` and swap the
/// Redis client for the in-process backend.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Get the raw stored text, `None` if the key is absent or expired
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store raw text; with a TTL the entry expires `ttl` after the write
    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()>;

    /// Delete keys, returning how many existed. An empty slice is a no-op.
    async fn delete(&self, keys: &[String]) -> CacheResult<u64>;

    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Keys matching a glob-style pattern (`*`, `?`, `[..]`)
    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>>;

    /// Remove every key in the keyspace. Maintenance use only.
    async fn flush_all(&self) -> CacheResult<()>;

    /// Lightweight liveness probe; never fails, reports `false` instead
    async fn health_check(&self) -> bool;

    async fn stats(&self) -> CacheResult<CacheStats>;

    /// Close the connection gracefully, force-dropping it if that fails
    async fn disconnect(&self);

    fn status(&self) -> ConnectionStatus;
}

/// Typed helpers layered over any [`CacheService`].
///
/// Values that serialize to a JSON string are stored verbatim; everything
/// else is stored as JSON text. Reads parse JSON first and fall back to the
/// raw text as a string, so plain strings round-trip exactly.
#[async_trait]
pub trait CacheExt: CacheService {
    /// Get a typed value from the cache.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(raw) => decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let raw = encode(value)?;
        self.set_raw(key, &raw, ttl).await
    }

    /// Get an untyped JSON value
    async fn get_value(&self, key: &str) -> CacheResult<Option<Value>> {
        self.get::<Value>(key).await
    }
}

impl<T: CacheService + ?Sized> CacheExt for T {}

fn encode<T: Serialize>(value: &T) -> CacheResult<String> {
    let json = serde_json::to_string(value)?;
    if json.starts_with('"') {
        Ok(serde_json::from_str::<String>(&json)?)
    } else {
        Ok(json)
    }
}

fn decode<T: DeserializeOwned>(raw: &str) -> CacheResult<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(err) => serde_json::from_value(Value::String(raw.to_owned()))
            .map_err(|_| CacheError::Serialization(err)),
    }
}
