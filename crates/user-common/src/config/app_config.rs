//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub redis: RedisConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Which cache implementation backs the listing cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    /// In-process cache, for local development without a Redis server
    Memory,
}

/// Cache selection
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Overrides any password embedded in the URL
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub db: i64,
    #[serde(default = "default_redis_timeout")]
    pub connect_timeout: Duration,
    #[serde(default = "default_redis_timeout")]
    pub command_timeout: Duration,
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            password: None,
            db: 0,
            connect_timeout: default_redis_timeout(),
            command_timeout: default_redis_timeout(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "user-service".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_redis_timeout() -> Duration {
    Duration::from_millis(5000)
}

fn default_max_reconnect_attempts() -> u32 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            lookup(key)
                .map(|s| {
                    s.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidValue(key, s))
                })
                .transpose()
        };

        let backend = match lookup("CACHE_BACKEND") {
            None => CacheBackend::default(),
            Some(s) => match s.to_lowercase().as_str() {
                "redis" => CacheBackend::Redis,
                "memory" => CacheBackend::Memory,
                _ => return Err(ConfigError::InvalidValue("CACHE_BACKEND", s)),
            },
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_else(default_env),
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: match lookup("API_PORT") {
                    Some(s) => s
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("API_PORT", s))?,
                    None => default_port(),
                },
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: lookup("DATABASE_MIN_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            cache: CacheConfig { backend },
            redis: RedisConfig {
                url: lookup("REDIS_URL").unwrap_or_else(default_redis_url),
                password: lookup("REDIS_PASSWORD").filter(|s| !s.is_empty()),
                db: match lookup("REDIS_DB") {
                    Some(s) => s
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("REDIS_DB", s))?,
                    None => 0,
                },
                connect_timeout: parsed("REDIS_CONNECT_TIMEOUT_MS")?
                    .map_or_else(default_redis_timeout, Duration::from_millis),
                command_timeout: parsed("REDIS_COMMAND_TIMEOUT_MS")?
                    .map_or_else(default_redis_timeout, Duration::from_millis),
                max_reconnect_attempts: parsed("REDIS_MAX_RECONNECT_ATTEMPTS")?
                    .map_or_else(default_max_reconnect_attempts, |n| n as u32),
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
