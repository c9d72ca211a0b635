//! Aggregation model types.

use crate::provider::{CheckInfo, ProviderError, ResultRecord};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// A monitored check with its derived type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub id: i64,
    pub name: String,
    pub host: String,
    /// Second whitespace-separated token of `name`, lower-cased
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl From<CheckInfo> for Check {
    fn from(info: CheckInfo) -> Self {
        let kind = info
            .name
            .split_whitespace()
            .nth(1)
            .map(|token| token.to_lowercase());

        Self {
            id: info.id,
            name: info.name,
            host: info.hostname,
            kind,
        }
    }
}

/// Reading carried by a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleValue {
    /// Response time in milliseconds
    Latency(f64),
    /// The check was down; serialized as `null`
    Down,
}

/// One raw reading at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp_ms: i64,
    pub value: SampleValue,
}

impl TryFrom<&ResultRecord> for Sample {
    type Error = ProviderError;

    fn try_from(record: &ResultRecord) -> Result<Self, Self::Error> {
        let down = record.status.as_deref() == Some("down");
        let latency = record
            .responsetime
            .as_ref()
            .and_then(serde_json::Value::as_f64);

        let value = match latency {
            Some(ms) if !down => SampleValue::Latency(ms),
            _ => SampleValue::Down,
        };

        let timestamp_ms = record
            .time
            .checked_mul(1000)
            .ok_or_else(|| ProviderError::Decode(format!("result time {} is out of range", record.time)))?;

        Ok(Self {
            timestamp_ms,
            value,
        })
    }
}

/// Raw samples of one check over one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSamples {
    pub check: Check,
    pub samples: Vec<Sample>,
}

/// One calendar day's aggregated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub value: f64,
}

/// A check's aggregated value for a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayValue {
    pub check: Check,
    pub bucket: DayBucket,
}

/// Day buckets of one check, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub check: Check,
    pub points: Vec<DayBucket>,
}

impl TimeSeries {
    /// Bare values in chronological order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Report line for one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub name: String,
    pub host: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Provider per-day average response time
    pub latency: Vec<f64>,
    /// Per-day downtime in milliseconds
    pub downtime: Vec<i64>,
}

/// Provider summary report over a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "providers")]
    pub entries: Vec<EntityReport>,
    pub first_date: DateTime<Utc>,
    pub last_date: DateTime<Utc>,
}
