//! In-process cache backend.
//!
//! Stands in for Redis in local development (`CACHE_BACKEND=memory`) and in
//! tests. Expiry uses the tokio clock so paused-time tests can step past a TTL.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error};

use super::glob::glob_match;
use super::service::CacheService;
use crate::connection::{ConnectionPhase, ConnectionStatus};
use crate::error::{CacheError, CacheResult};
use crate::info::{human_bytes, CacheStats};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// HashMap-backed [`CacheService`] with TTLs and a simulated outage switch
#[derive(Debug)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
    offline: AtomicBool,
    commands: AtomicU64,
    started: Instant,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            offline: AtomicBool::new(false),
            commands: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Simulate an outage: while offline every operation fails with
    /// [`CacheError::Connection`]
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.lock().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn command(&self, op: &'static str) -> CacheResult<()> {
        self.commands.fetch_add(1, Ordering::Relaxed);
        if self.offline.load(Ordering::SeqCst) {
            error!(op, "In-memory cache is offline");
            return Err(CacheError::Connection("cache offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        self.command("GET")?;
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let value = entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone());
        if value.is_none() {
            entries.remove(key);
        }

        match &value {
            Some(_) => debug!(key, "Cache hit"),
            None => debug!(key, "Cache miss"),
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        self.command("SET")?;
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.lock().insert(key.to_string(), entry);
        debug!(key, ttl_secs = ttl.map(|t| t.as_secs()), "Cached key");
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        self.command("DEL")?;
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let deleted = keys
            .iter()
            .filter_map(|key| entries.remove(key))
            .filter(|entry| entry.is_live(now))
            .count() as u64;
        debug!(requested = keys.len(), deleted, "Deleted keys");
        Ok(deleted)
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        self.command("EXISTS")?;
        let now = Instant::now();
        Ok(self
            .entries
            .lock()
            .get(key)
            .is_some_and(|entry| entry.is_live(now)))
    }

    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        self.command("SCAN")?;
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| entry.is_live(now));

        let mut keys: Vec<String> = entries
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect();
        keys.sort_unstable();
        debug!(pattern, count = keys.len(), "Scanned keys");
        Ok(keys)
    }

    async fn flush_all(&self) -> CacheResult<()> {
        self.command("FLUSHALL")?;
        self.entries.lock().clear();
        debug!("Flushed in-memory cache");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.command("PING").is_ok()
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        self.command("INFO")?;
        let now = Instant::now();
        let used: usize = self
            .entries
            .lock()
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(key, entry)| key.len() + entry.value.len())
            .sum();

        Ok(CacheStats {
            connected_clients: 1,
            used_memory: human_bytes(used as u64),
            total_commands_processed: self.commands.load(Ordering::Relaxed),
            instantaneous_ops_per_sec: 0,
            uptime: now.duration_since(self.started).as_secs(),
        })
    }

    async fn disconnect(&self) {
        debug!("In-memory cache has no connection to close");
    }

    fn status(&self) -> ConnectionStatus {
        let phase = if self.offline.load(Ordering::SeqCst) {
            ConnectionPhase::Disconnected
        } else {
            ConnectionPhase::Connected
        };
        ConnectionStatus {
            phase,
            reconnect_attempts: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CacheExt;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Page {
        items: Vec<u32>,
        label: String,
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let cache = MemoryCache::new();
        let page = Page {
            items: vec![1, 2, 3],
            label: "first".to_string(),
        };

        cache.set("page", &page, None).await.unwrap();
        assert_eq!(cache.get::<Page>("page").await.unwrap(), Some(page));
        assert_eq!(cache.get::<Page>("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_plain_string_round_trips_exactly() {
        let cache = MemoryCache::new();

        cache.set_raw("greeting", "hello world", None).await.unwrap();
        assert_eq!(
            cache.get::<String>("greeting").await.unwrap().as_deref(),
            Some("hello world")
        );
        assert_eq!(
            cache.get_value("greeting").await.unwrap(),
            Some(serde_json::Value::String("hello world".to_string()))
        );

        cache.set("s", &"stored as-is".to_string(), None).await.unwrap();
        assert_eq!(cache.get_raw("s").await.unwrap().as_deref(), Some("stored as-is"));
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_serialization_error() {
        let cache = MemoryCache::new();
        cache.set_raw("page", "garbage", None).await.unwrap();

        let err = cache.get::<Page>("page").await.unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let cache = MemoryCache::new();
        cache
            .set_raw("k", "v", Some(Duration::from_secs(1800)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(1799)).await;
        assert!(cache.exists("k").await.unwrap());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!cache.exists("k").await.unwrap());
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_counts_and_empty_noop() {
        let cache = MemoryCache::new();
        cache.set_raw("a", "1", None).await.unwrap();
        cache.set_raw("b", "2", None).await.unwrap();

        assert_eq!(cache.delete(&[]).await.unwrap(), 0);
        assert_eq!(cache.delete(&keys(&["a", "b", "c"])).await.unwrap(), 2);
        assert_eq!(cache.delete(&keys(&["a"])).await.unwrap(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_keys_by_pattern() {
        let cache = MemoryCache::new();
        cache.set_raw("users:page_1:limit_10", "[]", None).await.unwrap();
        cache.set_raw("users:page_2:limit_10", "[]", None).await.unwrap();
        cache.set_raw("sessions:1", "x", None).await.unwrap();

        assert_eq!(
            cache.keys("users:*").await.unwrap(),
            keys(&["users:page_1:limit_10", "users:page_2:limit_10"])
        );
        assert_eq!(cache.keys("nothing:*").await.unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_flush_and_stats() {
        let cache = MemoryCache::new();
        cache.set_raw("a", "1234", None).await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.connected_clients, 1);
        assert_eq!(stats.used_memory, "5B");
        assert_eq!(stats.total_commands_processed, 2);

        cache.flush_all().await.unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_offline_fails_every_operation() {
        let cache = MemoryCache::new();
        cache.set_offline(true);

        assert!(matches!(
            cache.get_raw("k").await,
            Err(CacheError::Connection(_))
        ));
        assert!(cache.set_raw("k", "v", None).await.is_err());
        assert!(cache.keys("*").await.is_err());
        assert!(!cache.health_check().await);
        assert_eq!(cache.status().phase, ConnectionPhase::Disconnected);

        cache.set_offline(false);
        assert!(cache.health_check().await);
        assert_eq!(cache.status().phase, ConnectionPhase::Connected);
    }
}
