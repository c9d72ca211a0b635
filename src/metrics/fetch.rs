//! Day window fetching: raw samples for every check over one calendar day.

use super::{CheckSamples, Check, DayBucket, DayMetric, DayValue, Metrics, MetricsError, Sample};
use crate::provider::{MonitoringProvider, ResultsQuery, TimeWindow};

use chrono::NaiveDate;
use futures_util::future::try_join_all;

impl<P: MonitoringProvider> Metrics<P> {
    /// Raw samples of every check on `date`, oldest first.
    ///
    /// An empty check list or a check without results is not an error here;
    /// both are logged and come back empty.
    pub async fn check_results(&self, date: NaiveDate) -> Result<Vec<CheckSamples>, MetricsError> {
        let window = self
            .clock
            .day_window(date)
            .ok_or(MetricsError::DateOutOfRange)?;

        self.fetch_window(window).await
    }

    pub(super) async fn fetch_window(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<CheckSamples>, MetricsError> {
        let checks = self.provider.list_checks().await?;
        if checks.is_empty() {
            tracing::warn!("Provider returned no checks, verify the API token");
            return Ok(Vec::new());
        }

        let fetches = checks
            .into_iter()
            .map(|info| self.fetch_check_window(Check::from(info), window));

        try_join_all(fetches).await
    }

    async fn fetch_check_window(
        &self,
        check: Check,
        window: TimeWindow,
    ) -> Result<CheckSamples, MetricsError> {
        let query = ResultsQuery {
            limit: self.results_limit,
            window: Some(window),
        };

        let records = self.provider.fetch_results(check.id, query).await?;
        if records.is_empty() {
            tracing::warn!(
                "No results for {} between {} and {}",
                check.name,
                window.from,
                window.to
            );
        }

        let mut samples: Vec<Sample> = records
            .iter()
            .filter_map(|record| match Sample::try_from(record) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    tracing::warn!("Skipping result of {}: {}", check.name, e);
                    None
                }
            })
            .collect();
        samples.sort_by_key(|s| s.timestamp_ms);

        Ok(CheckSamples { check, samples })
    }

    /// Fetch one day and reduce every check's samples with `metric`.
    ///
    /// Unlike `check_results`, an empty check list is an error: there is
    /// nothing to aggregate.
    pub(super) async fn day_values(
        &self,
        date: NaiveDate,
        metric: DayMetric,
    ) -> Result<Vec<DayValue>, MetricsError> {
        let window = self
            .clock
            .day_window(date)
            .ok_or(MetricsError::DateOutOfRange)?;

        let series = self.fetch_window(window).await?;
        if series.is_empty() {
            return Err(MetricsError::NoChecks);
        }

        tracing::debug!("Aggregating {:?} for {} checks on {}", metric, series.len(), date);

        series
            .into_iter()
            .map(|CheckSamples { check, samples }| {
                let value = metric
                    .apply(&samples)
                    .map_err(|source| MetricsError::Aggregate {
                        check: check.name.clone(),
                        date,
                        source,
                    })?;

                Ok(DayValue {
                    check,
                    bucket: DayBucket { date, value },
                })
            })
            .collect()
    }
}
