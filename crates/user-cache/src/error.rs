//! Cache error types

/// Errors raised by cache backends
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// No usable connection: the connect attempt failed or the client is
    /// currently re-establishing its connection
    #[error("Cache connection unavailable: {0}")]
    Connection(String),

    /// Background reconnection gave up; only an explicit reconnect recovers
    #[error("Cache reconnection abandoned after {attempts} attempts")]
    ReconnectExhausted { attempts: u32 },

    /// A command failed on an established connection
    #[error("Cache {op} failed for '{key}': {source}")]
    Operation {
        op: &'static str,
        key: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("Cache {op} timed out")]
    Timeout { op: &'static str },

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Whether the failure means the cache could not be reached at all
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::ReconnectExhausted { .. })
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_classification() {
        assert!(CacheError::Connection("refused".to_string()).is_connection());
        assert!(CacheError::ReconnectExhausted { attempts: 10 }.is_connection());
        assert!(!CacheError::Timeout { op: "GET" }.is_connection());
    }

    #[test]
    fn test_display() {
        let err = CacheError::ReconnectExhausted { attempts: 10 };
        assert_eq!(err.to_string(), "Cache reconnection abandoned after 10 attempts");

        let err = CacheError::Timeout { op: "SCAN" };
        assert_eq!(err.to_string(), "Cache SCAN timed out");
    }
}
