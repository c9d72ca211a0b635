//! In-memory provider for pipeline tests.

use crate::provider::{
    CheckInfo, DaySummary, MonitoringProvider, OutageState, OutageSummary, PerformanceSummary,
    ProviderError, ResultRecord, ResultsQuery, TimeWindow,
};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Unix seconds of a UTC wall-clock time.
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().timestamp()
}

#[derive(Default)]
pub struct FakeProvider {
    checks: Vec<CheckInfo>,
    listings: Mutex<VecDeque<Vec<CheckInfo>>>,
    results: HashMap<i64, Vec<ResultRecord>>,
    summaries: HashMap<i64, PerformanceSummary>,
    outages: HashMap<i64, Vec<OutageState>>,
    failing: HashSet<i64>,
    last_limit: Mutex<Option<u32>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check(mut self, id: i64, name: &str) -> Self {
        self.checks.push(CheckInfo {
            id,
            name: name.to_string(),
            hostname: format!("check{}.example.com", id),
        });
        self
    }

    /// Queue a one-off check listing, served before the regular one.
    pub fn with_listing(self, ids: &[i64]) -> Self {
        let listing = self
            .checks
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect();
        self.listings.lock().unwrap().push_back(listing);
        self
    }

    /// Add a raw result; `None` latency records a down sample.
    pub fn with_result(mut self, id: i64, time: i64, latency: Option<f64>) -> Self {
        let record = ResultRecord {
            time,
            status: Some(if latency.is_some() { "up" } else { "down" }.to_string()),
            responsetime: latency.map(|ms| serde_json::json!(ms)),
        };
        self.results.entry(id).or_default().push(record);
        self
    }

    pub fn with_day_summary(mut self, id: i64, starttime: i64, avgresponse: f64) -> Self {
        self.summaries.entry(id).or_default().days.push(DaySummary {
            starttime,
            avgresponse,
        });
        self
    }

    pub fn with_outage(mut self, id: i64, status: &str, timefrom: i64, timeto: i64) -> Self {
        self.outages.entry(id).or_default().push(OutageState {
            status: status.to_string(),
            timefrom,
            timeto,
        });
        self
    }

    /// Every fetch for this check fails with a network error.
    pub fn failing_check(mut self, id: i64) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn last_limit(&self) -> Option<u32> {
        *self.last_limit.lock().unwrap()
    }

    fn check_failure(&self, id: i64) -> Result<(), ProviderError> {
        if self.failing.contains(&id) {
            return Err(ProviderError::Network(format!("check {} unreachable", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl MonitoringProvider for FakeProvider {
    async fn list_checks(&self) -> Result<Vec<CheckInfo>, ProviderError> {
        if let Some(listing) = self.listings.lock().unwrap().pop_front() {
            return Ok(listing);
        }
        Ok(self.checks.clone())
    }

    async fn fetch_results(
        &self,
        check_id: i64,
        query: ResultsQuery,
    ) -> Result<Vec<ResultRecord>, ProviderError> {
        self.check_failure(check_id)?;
        *self.last_limit.lock().unwrap() = Some(query.limit);

        let records = self.results.get(&check_id).cloned().unwrap_or_default();
        Ok(records
            .into_iter()
            .filter(|r| match &query.window {
                Some(window) => {
                    let (from, to) = window.as_unix();
                    r.time >= from && r.time < to
                }
                None => true,
            })
            .take(query.limit as usize)
            .collect())
    }

    async fn fetch_performance_summary(
        &self,
        check_id: i64,
        _window: TimeWindow,
    ) -> Result<PerformanceSummary, ProviderError> {
        self.check_failure(check_id)?;
        Ok(self.summaries.get(&check_id).cloned().unwrap_or_default())
    }

    async fn fetch_outage_summary(
        &self,
        check_id: i64,
        _window: TimeWindow,
    ) -> Result<OutageSummary, ProviderError> {
        self.check_failure(check_id)?;
        Ok(OutageSummary {
            states: self.outages.get(&check_id).cloned().unwrap_or_default(),
        })
    }
}
