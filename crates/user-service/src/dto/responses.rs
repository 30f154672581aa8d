//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Field names are camelCase; the password hash has no field here at all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use user_cache::{CacheStats, ConnectionStatus};
use user_core::{UserId, UserRole, UserStatus};

// ============================================================================
// User Responses
// ============================================================================

/// Full non-sensitive view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_email_verified: bool,
    pub birthdate: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backend
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub cache: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, cache_healthy: bool) -> Self {
        let all_healthy = database_healthy && cache_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                cache: if cache_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

/// Cache statistics plus the client's connection state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealthResponse {
    pub connection: ConnectionStatus,
    pub stats: CacheStats,
}
