//! # user-common
//!
//! Shared utilities including configuration, error handling, password hashing, and telemetry.

pub mod config;
pub mod error;
pub mod security;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, CacheBackend, CacheConfig, ConfigError, CorsConfig, DatabaseConfig,
    Environment, RedisConfig, ServerConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use security::{hash_password, hash_password_blocking, verify_password};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
