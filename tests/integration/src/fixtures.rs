//! Request and response bodies shared by the integration tests

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Suffix that is unique within and across test runs
pub fn unique_suffix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}{n}", Utc::now().timestamp_millis())
}

/// Body of `POST /users`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl CreateUserBody {
    /// Minimal body with a fresh email
    pub fn unique() -> Self {
        Self {
            email: format!("user_{}@example.com", unique_suffix()),
            password: "correct horse battery staple".to_string(),
            ..Self::default()
        }
    }

    /// Body with every optional profile field set
    pub fn full() -> Self {
        Self {
            name: Some("Ada Lovelace".to_string()),
            phone: Some("+44-20-7946-0000".to_string()),
            avatar: Some("https://i.pravatar.cc/150?img=5".to_string()),
            birthdate: Some("1990-12-10".to_string()),
            address: Some("12 St James's Square".to_string()),
            bio: Some("Analyst of engines.".to_string()),
            ..Self::unique()
        }
    }
}

/// Body of a single user response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub status: String,
    pub is_email_verified: bool,
    pub birthdate: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entry of the `GET /users` listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryBody {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetailBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetailBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
