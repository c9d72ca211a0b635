//! Monitoring provider module.
//!
//! Defines the provider abstraction the aggregation pipelines fetch from,
//! the records it returns, and the Pingdom implementation.

mod pingdom;

pub use pingdom::*;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider error types.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    Decode(String),
}

/// A half-open span of absolute time `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Window bounds as unix seconds, the unit the provider speaks.
    pub fn as_unix(&self) -> (i64, i64) {
        (self.from.timestamp(), self.to.timestamp())
    }
}

/// A check as listed by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInfo {
    pub id: i64,
    pub name: String,
    pub hostname: String,
}

/// Query parameters for raw results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultsQuery {
    pub limit: u32,
    pub window: Option<TimeWindow>,
}

/// One raw result.
///
/// `responsetime` is kept as raw JSON: anything that is not a number marks
/// the check as down at `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Unix seconds
    pub time: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub responsetime: Option<serde_json::Value>,
}

/// Per-day entry of a performance summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Unix seconds
    pub starttime: i64,
    /// Average response time in milliseconds
    pub avgresponse: f64,
}

/// Provider pre-aggregated performance for a window at day resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    #[serde(default)]
    pub days: Vec<DaySummary>,
}

/// A state transition period reported by the outage summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutageState {
    pub status: String,
    /// Unix seconds
    pub timefrom: i64,
    /// Unix seconds
    pub timeto: i64,
}

impl OutageState {
    pub fn is_down(&self) -> bool {
        self.status == "down"
    }
}

/// Up/down periods for a check over a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutageSummary {
    #[serde(default)]
    pub states: Vec<OutageState>,
}

/// Abstraction over the monitoring provider for dependency injection.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait MonitoringProvider: Send + Sync {
    /// List every check visible to the configured credentials.
    async fn list_checks(&self) -> Result<Vec<CheckInfo>, ProviderError>;

    /// Fetch raw results for one check.
    async fn fetch_results(
        &self,
        check_id: i64,
        query: ResultsQuery,
    ) -> Result<Vec<ResultRecord>, ProviderError>;

    /// Fetch the per-day performance summary for one check.
    async fn fetch_performance_summary(
        &self,
        check_id: i64,
        window: TimeWindow,
    ) -> Result<PerformanceSummary, ProviderError>;

    /// Fetch the outage summary for one check.
    async fn fetch_outage_summary(
        &self,
        check_id: i64,
        window: TimeWindow,
    ) -> Result<OutageSummary, ProviderError>;
}
