//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CacheBackend, CacheConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, RedisConfig, ServerConfig,
};
