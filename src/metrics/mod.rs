//! Metrics module: turns raw provider telemetry into day and week series.
//!
//! Two independent pipelines share the day aggregation and downtime
//! splitting primitives:
//! - the range pipeline fetches raw results per calendar day and reduces
//!   them to one latency average or uptime ratio per check and day;
//! - the report pipeline combines the provider's own per-day performance
//!   summary with downtime split out of the outage summary.

mod aggregate;
mod calendar;
mod downtime;
mod fetch;
mod models;
mod range;
mod report;

#[cfg(test)]
mod testing;

pub use aggregate::*;
pub use calendar::*;
pub use downtime::*;
pub use models::*;
pub use range::zip_days;
pub use report::{build_entry, CheckSummary};

use crate::config::AggregationConfig;
use crate::provider::{MonitoringProvider, ProviderError};

use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

/// Days merged by the week entry points.
pub const WEEK_DAYS: u32 = 7;

/// Metrics error types.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("provider returned no checks")]
    NoChecks,
    #[error("cannot aggregate {check} on {date}: {source}")]
    Aggregate {
        check: String,
        date: NaiveDate,
        #[source]
        source: AggregateError,
    },
    #[error("checks for {date} do not match the first day (expected {expected}, got {found})")]
    MisalignedDay {
        date: NaiveDate,
        expected: usize,
        found: usize,
    },
    #[error("performance summary for {check} has no days")]
    EmptySummary { check: String },
    #[error("range must cover at least one day")]
    EmptyRange,
    #[error("date out of range")]
    DateOutOfRange,
}

/// Aggregation entry points bound to one provider handle.
pub struct Metrics<P: MonitoringProvider> {
    provider: Arc<P>,
    clock: DayClock,
    results_limit: u32,
    excluded_prefix: String,
}

impl<P: MonitoringProvider> Metrics<P> {
    /// Create the entry points for the given provider and settings.
    pub fn new(provider: Arc<P>, config: &AggregationConfig) -> Result<Self, MetricsError> {
        let clock = DayClock::from_minutes(config.utc_offset_minutes).ok_or_else(|| {
            MetricsError::Config(format!(
                "UTC offset of {} minutes is out of range",
                config.utc_offset_minutes
            ))
        })?;

        Ok(Self {
            provider,
            clock,
            results_limit: config.results_limit,
            excluded_prefix: config.excluded_prefix.clone(),
        })
    }

    pub fn clock(&self) -> &DayClock {
        &self.clock
    }

    /// Average latency of every check on `date`.
    pub async fn day_latency(&self, date: NaiveDate) -> Result<Vec<DayValue>, MetricsError> {
        self.day_values(date, DayMetric::Latency).await
    }

    /// Uptime ratio of every check on `date`.
    pub async fn day_uptime(&self, date: NaiveDate) -> Result<Vec<DayValue>, MetricsError> {
        self.day_values(date, DayMetric::Uptime).await
    }

    /// Daily average latency for the week ending on `date`, oldest first.
    pub async fn week_latency(&self, date: NaiveDate) -> Result<Vec<TimeSeries>, MetricsError> {
        self.merge_range(date, WEEK_DAYS, DayMetric::Latency).await
    }

    /// Daily uptime ratio for the week ending on `date`, oldest first.
    pub async fn week_uptime(&self, date: NaiveDate) -> Result<Vec<TimeSeries>, MetricsError> {
        self.merge_range(date, WEEK_DAYS, DayMetric::Uptime).await
    }
}
