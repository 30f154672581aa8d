//! Cache backends and the service trait they implement

mod factory;
mod glob;
mod memory;
mod redis_client;
mod service;

pub use factory::connect_cache;
pub use glob::glob_match;
pub use memory::MemoryCache;
pub use redis_client::{RedisCacheClient, RedisCacheConfig, RedisConnector};
pub use service::{CacheExt, CacheService};
