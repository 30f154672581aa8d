//! Cache key builders for the user listing

use std::time::Duration;

/// Pattern matching every cached listing page
pub const USER_LIST_PATTERN: &str = "users:*";

/// Lifetime of a cached listing page
pub const USER_LIST_TTL: Duration = Duration::from_secs(1800);

/// Key under which one listing page is cached
pub fn user_list_key(page: u64, limit: u64) -> String {
    format!("users:page_{page}:limit_{limit}")
}
