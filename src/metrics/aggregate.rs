//! Day aggregation of raw samples.

use super::{Sample, SampleValue};

use serde::Serialize;
use thiserror::Error;

/// Reasons a day's samples cannot be reduced to a number.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no samples")]
    NoSamples,
    #[error("no latency samples")]
    NoLatency,
}

/// Metric a day pipeline reduces samples to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMetric {
    Latency,
    Uptime,
}

impl DayMetric {
    pub fn apply(&self, samples: &[Sample]) -> Result<f64, AggregateError> {
        match self {
            DayMetric::Latency => average_latency(samples),
            DayMetric::Uptime => uptime_ratio(samples),
        }
    }
}

/// Mean of the latency samples; down samples are skipped, not zeroed.
pub fn average_latency(samples: &[Sample]) -> Result<f64, AggregateError> {
    if samples.is_empty() {
        return Err(AggregateError::NoSamples);
    }

    let (sum, count) = samples
        .iter()
        .filter_map(|s| match s.value {
            SampleValue::Latency(ms) => Some(ms),
            SampleValue::Down => None,
        })
        .fold((0.0, 0usize), |(sum, count), ms| (sum + ms, count + 1));

    if count == 0 {
        return Err(AggregateError::NoLatency);
    }

    Ok(sum / count as f64)
}

/// Share of samples in which the check was up.
pub fn uptime_ratio(samples: &[Sample]) -> Result<f64, AggregateError> {
    if samples.is_empty() {
        return Err(AggregateError::NoSamples);
    }

    let downs = samples
        .iter()
        .filter(|s| s.value == SampleValue::Down)
        .count();

    Ok((samples.len() - downs) as f64 / samples.len() as f64)
}
