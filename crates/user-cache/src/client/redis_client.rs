//! Redis-backed cache client.
//!
//! One logical multiplexed connection per process, managed by a
//! [`ConnectionManager`]. Every command runs under a fixed timeout; transport
//! failures hand the connection to the background reconnect loop.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, IntoConnectionInfo, RedisError};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::service::CacheService;
use crate::connection::{ConnectionManager, ConnectionStatus, Connector, ReconnectPolicy};
use crate::error::{CacheError, CacheResult};
use crate::info::{parse_info, CacheStats};

/// Keys requested per SCAN round trip
const SCAN_COUNT: usize = 100;

/// Redis client configuration
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., `redis://localhost:6379`)
    pub url: String,
    /// Overrides any password embedded in the URL
    pub password: Option<String>,
    /// Logical database index
    pub db: i64,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
    pub max_reconnect_attempts: u32,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            password: None,
            db: 0,
            connect_timeout: Duration::from_millis(5000),
            command_timeout: Duration::from_millis(5000),
            max_reconnect_attempts: 10,
        }
    }
}

impl From<&user_common::RedisConfig> for RedisCacheConfig {
    fn from(config: &user_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            password: config.password.clone(),
            db: config.db,
            connect_timeout: config.connect_timeout,
            command_timeout: config.command_timeout,
            max_reconnect_attempts: config.max_reconnect_attempts,
        }
    }
}

/// Opens multiplexed Redis connections under the connect timeout
pub struct RedisConnector {
    client: redis::Client,
    connect_timeout: Duration,
}

#[async_trait]
impl Connector for RedisConnector {
    type Conn = MultiplexedConnection;

    async fn connect(&self) -> CacheResult<MultiplexedConnection> {
        match timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(CacheError::Connection(e.to_string())),
            Err(_) => Err(CacheError::Connection(format!(
                "connect timed out after {}ms",
                self.connect_timeout.as_millis()
            ))),
        }
    }
}

/// Whether a command error means the connection itself is unusable
fn is_transport_error(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() || err.is_timeout()
}

/// Redis implementation of [`CacheService`]
pub struct RedisCacheClient {
    manager: ConnectionManager<RedisConnector>,
    command_timeout: Duration,
}

impl std::fmt::Debug for RedisCacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheClient")
            .field("status", &self.manager.status())
            .finish()
    }
}

impl RedisCacheClient {
    /// Create a client. No connection is opened until the first operation.
    pub fn new(config: RedisCacheConfig) -> CacheResult<Self> {
        let mut info = config
            .url
            .as_str()
            .into_connection_info()
            .map_err(|e| CacheError::InvalidConfig(e.to_string()))?;
        if let Some(password) = &config.password {
            info.redis.password = Some(password.clone());
        }
        info.redis.db = config.db;

        let client =
            redis::Client::open(info).map_err(|e| CacheError::InvalidConfig(e.to_string()))?;

        // Redact credentials from URL for logging
        let safe_url = config.url.split('@').next_back().unwrap_or(&config.url);
        info!(
            url = %safe_url,
            db = config.db,
            max_reconnect_attempts = config.max_reconnect_attempts,
            "Redis cache client created"
        );

        let connector = RedisConnector {
            client,
            connect_timeout: config.connect_timeout,
        };

        Ok(Self {
            manager: ConnectionManager::new(
                connector,
                ReconnectPolicy::with_max_attempts(config.max_reconnect_attempts),
            ),
            command_timeout: config.command_timeout,
        })
    }

    /// Create a client from user-common config
    pub fn from_config(config: &user_common::RedisConfig) -> CacheResult<Self> {
        Self::new(RedisCacheConfig::from(config))
    }

    /// Connect now instead of on first use
    pub async fn connect(&self) -> CacheResult<()> {
        self.manager.acquire().await.map(|_| ())
    }

    async fn run<T, F, Fut>(&self, op: &'static str, key: &str, command: F) -> CacheResult<T>
    where
        F: FnOnce(MultiplexedConnection) -> Fut + Send,
        Fut: Future<Output = redis::RedisResult<T>> + Send,
        T: Send,
    {
        let lease = match self.manager.acquire().await {
            Ok(lease) => lease,
            Err(e) => {
                error!(op, key, error = %e, "Cache unavailable");
                return Err(e);
            }
        };

        match timeout(self.command_timeout, command(lease.conn)).await {
            Ok(Ok(value)) => {
                debug!(op, key, "Cache command succeeded");
                Ok(value)
            }
            Ok(Err(source)) => {
                if is_transport_error(&source) {
                    self.manager.report_failure(lease.generation);
                }
                error!(op, key, error = %source, "Cache command failed");
                Err(CacheError::Operation {
                    op,
                    key: key.to_string(),
                    source,
                })
            }
            Err(_) => {
                self.manager.report_failure(lease.generation);
                error!(
                    op,
                    key,
                    timeout_ms = self.command_timeout.as_millis() as u64,
                    "Cache command timed out"
                );
                Err(CacheError::Timeout { op })
            }
        }
    }
}

#[async_trait]
impl CacheService for RedisCacheClient {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let value = self
            .run("GET", key, |mut conn| async move {
                conn.get::<_, Option<String>>(key).await
            })
            .await?;

        match &value {
            Some(_) => debug!(key, "Cache hit"),
            None => debug!(key, "Cache miss"),
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        self.run("SET", key, |mut conn| async move {
            match ttl {
                Some(ttl) => {
                    conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                        .await
                }
                None => conn.set::<_, _, ()>(key, value).await,
            }
        })
        .await
    }

    async fn delete(&self, keys: &[String]) -> CacheResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let label = keys.join(" ");
        self.run("DEL", &label, |mut conn| async move {
            conn.del::<_, u64>(keys).await
        })
        .await
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        self.run("EXISTS", key, |mut conn| async move {
            conn.exists::<_, bool>(key).await
        })
        .await
    }

    async fn keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let mut found = self
            .run("SCAN", pattern, |mut conn| async move {
                let mut cursor: u64 = 0;
                let mut keys = Vec::new();
                loop {
                    let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(pattern)
                        .arg("COUNT")
                        .arg(SCAN_COUNT)
                        .query_async(&mut conn)
                        .await?;

                    keys.extend(batch);
                    cursor = next_cursor;
                    if cursor == 0 {
                        break;
                    }
                }
                Ok(keys)
            })
            .await?;

        // SCAN may report a key more than once
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }

    async fn flush_all(&self) -> CacheResult<()> {
        warn!("Flushing the entire cache keyspace");
        self.run("FLUSHALL", "*", |mut conn| async move {
            redis::cmd("FLUSHALL").query_async::<()>(&mut conn).await
        })
        .await
    }

    async fn health_check(&self) -> bool {
        let reply = self
            .run("PING", "", |mut conn| async move {
                redis::cmd("PING").query_async::<String>(&mut conn).await
            })
            .await;

        match reply {
            Ok(reply) => reply == "PONG",
            Err(e) => {
                warn!(error = %e, "Cache health check failed");
                false
            }
        }
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let info = self
            .run("INFO", "", |mut conn| async move {
                redis::cmd("INFO").query_async::<String>(&mut conn).await
            })
            .await?;
        Ok(parse_info(&info))
    }

    async fn disconnect(&self) {
        let Some(mut conn) = self.manager.disconnect() else {
            debug!("Cache client already disconnected");
            return;
        };

        match timeout(
            self.command_timeout,
            redis::cmd("QUIT").query_async::<()>(&mut conn),
        )
        .await
        {
            Ok(Ok(())) => info!("Cache client disconnected gracefully"),
            Ok(Err(e)) => warn!(error = %e, "QUIT failed, dropping the connection"),
            Err(_) => warn!("QUIT timed out, dropping the connection"),
        }
    }

    fn status(&self) -> ConnectionStatus {
        self.manager.status()
    }
}
