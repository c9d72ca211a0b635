//! Configuration module for pingstats.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;

/// Credentials and endpoint for the monitoring provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Pingdom API token (no default)
    pub api_token: String,
    /// Base URL of the Pingdom REST API (default: "https://api.pingdom.com/api/3.1")
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: "https://api.pingdom.com/api/3.1".to_string(),
        }
    }
}

/// Settings for the aggregation pipelines.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Maximum number of raw results fetched per check and day (default: 1000)
    pub results_limit: u32,
    /// Checks whose type token starts with this prefix are left out of reports (default: "dd")
    pub excluded_prefix: String,
    /// Offset from UTC, in minutes, that defines calendar days (default: 0)
    pub utc_offset_minutes: i32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            results_limit: 1000,
            excluded_prefix: "dd".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

/// Full configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub aggregation: AggregationConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PINGSTATS_API_TOKEN`: Pingdom API token
    /// - `PINGSTATS_BASE_URL`: API base URL
    /// - `PINGSTATS_RESULTS_LIMIT`: raw results per check and day (default: 1000)
    /// - `PINGSTATS_EXCLUDED_PREFIX`: excluded type prefix (default: "dd")
    /// - `PINGSTATS_UTC_OFFSET_MINUTES`: calendar day offset (default: 0)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(token) = lookup("PINGSTATS_API_TOKEN") {
            cfg.provider.api_token = token;
        }

        if let Some(url) = lookup("PINGSTATS_BASE_URL") {
            cfg.provider.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(limit) = lookup("PINGSTATS_RESULTS_LIMIT") {
            if let Ok(limit) = limit.parse() {
                cfg.aggregation.results_limit = limit;
            }
        }

        if let Some(prefix) = lookup("PINGSTATS_EXCLUDED_PREFIX") {
            cfg.aggregation.excluded_prefix = prefix;
        }

        if let Some(offset) = lookup("PINGSTATS_UTC_OFFSET_MINUTES") {
            if let Ok(offset) = offset.parse() {
                cfg.aggregation.utc_offset_minutes = offset;
            }
        }

        cfg
    }
}
