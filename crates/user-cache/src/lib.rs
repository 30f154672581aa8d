//! # user-cache
//!
//! Cache client adapter for the user listing cache.
//!
//! ## Features
//!
//! - **Service trait**: [`CacheService`] over raw strings plus the typed
//!   [`CacheExt`] helpers
//! - **Redis client**: one lazily opened multiplexed connection with
//!   coalesced connects, fixed timeouts and background reconnection
//! - **In-memory backend**: [`MemoryCache`] for development and tests
//! - **Keys**: builders for the listing cache keys
//!
//! ## Example
//!
//! ```ignore
//! use user_cache::{CacheExt, CacheService, RedisCacheClient, RedisCacheConfig};
//!
//! let client = RedisCacheClient::new(RedisCacheConfig::default())?;
//! client.set("greeting", &"hello", None).await?;
//! let value: Option<String> = client.get("greeting").await?;
//! ```

pub mod client;
pub mod connection;
pub mod error;
pub mod info;
pub mod keys;

pub use client::{
    connect_cache, glob_match, CacheExt, CacheService, MemoryCache, RedisCacheClient,
    RedisCacheConfig, RedisConnector,
};
pub use connection::{ConnectionManager, ConnectionPhase, ConnectionStatus, Connector, ReconnectPolicy};
pub use error::{CacheError, CacheResult};
pub use info::{parse_info, CacheStats};
pub use keys::{user_list_key, USER_LIST_PATTERN, USER_LIST_TTL};
