//! Parsing of the Redis `INFO` report

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Server statistics exposed by the cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub connected_clients: u64,
    /// Human readable memory usage as reported by the server, e.g. `1.05M`
    pub used_memory: String,
    pub total_commands_processed: u64,
    pub instantaneous_ops_per_sec: u64,
    /// Server uptime in seconds
    pub uptime: u64,
}

/// Parse the colon-delimited `INFO` text.
///
/// Section headers and blank lines are skipped. Missing or non-numeric
/// counters read as 0 and missing memory usage reads as `0B`.
pub fn parse_info(info: &str) -> CacheStats {
    let fields: HashMap<&str, &str> = info
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim(), v.trim()))
        .collect();

    let number = |name: &str| -> u64 {
        fields
            .get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };

    CacheStats {
        connected_clients: number("connected_clients"),
        used_memory: fields
            .get("used_memory_human")
            .filter(|v| !v.is_empty())
            .map_or_else(|| "0B".to_string(), |v| (*v).to_string()),
        total_commands_processed: number("total_commands_processed"),
        instantaneous_ops_per_sec: number("instantaneous_ops_per_sec"),
        uptime: number("uptime_in_seconds"),
    }
}

/// Format a byte count the way Redis renders `used_memory_human`
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["K", "M", "G", "T"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2}{}", UNITS[unit])
}
