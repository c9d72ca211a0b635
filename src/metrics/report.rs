//! Report building from provider performance and outage summaries.

use super::{split_downtime, Check, EntityReport, Metrics, MetricsError, Report};
use crate::provider::{MonitoringProvider, PerformanceSummary, TimeWindow};

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;

/// Everything fetched for one check before it becomes a report line.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub check: Check,
    pub performance: PerformanceSummary,
    /// Per-day downtime in milliseconds
    pub downtime: Vec<i64>,
}

impl<P: MonitoringProvider> Metrics<P> {
    /// Build the latency/downtime report for every reportable check over
    /// `window`.
    ///
    /// Any failing check aborts the report. The date span comes from the
    /// first listed check's performance summary.
    pub async fn build_report(&self, window: TimeWindow) -> Result<Report, MetricsError> {
        let checks = self.provider.list_checks().await?;
        if checks.is_empty() {
            return Err(MetricsError::NoChecks);
        }

        tracing::info!(
            "Building report for {} checks from {} to {}",
            checks.len(),
            window.from,
            window.to
        );

        let fetches = checks
            .into_iter()
            .map(|info| self.fetch_check_summary(Check::from(info), window));
        let summaries = try_join_all(fetches).await?;

        let (first_date, last_date) = match summaries.first() {
            Some(first) => date_span(first)?,
            None => return Err(MetricsError::NoChecks),
        };

        let entries: Vec<EntityReport> = summaries
            .iter()
            .filter_map(|summary| build_entry(summary, &self.excluded_prefix))
            .collect();

        tracing::debug!(
            "Report has {} of {} checks",
            entries.len(),
            summaries.len()
        );

        Ok(Report {
            entries,
            first_date,
            last_date,
        })
    }

    async fn fetch_check_summary(
        &self,
        check: Check,
        window: TimeWindow,
    ) -> Result<CheckSummary, MetricsError> {
        let (performance, outages) = tokio::try_join!(
            self.provider.fetch_performance_summary(check.id, window),
            self.provider.fetch_outage_summary(check.id, window),
        )?;

        let downtime = split_downtime(&self.clock, &window, &outages.states);

        Ok(CheckSummary {
            check,
            performance,
            downtime,
        })
    }
}

/// Report line for a check, `None` for checks left out of reports.
///
/// A check is reported only when its name carries a type token that does
/// not start with `excluded_prefix`. An empty prefix excludes nothing.
pub fn build_entry(summary: &CheckSummary, excluded_prefix: &str) -> Option<EntityReport> {
    let check = &summary.check;
    let kind = check.kind.as_ref()?;
    if !excluded_prefix.is_empty() && kind.starts_with(excluded_prefix) {
        return None;
    }

    Some(EntityReport {
        name: check.name.clone(),
        host: check.host.clone(),
        kind: kind.clone(),
        latency: summary
            .performance
            .days
            .iter()
            .map(|day| day.avgresponse)
            .collect(),
        downtime: summary.downtime.clone(),
    })
}

fn date_span(summary: &CheckSummary) -> Result<(DateTime<Utc>, DateTime<Utc>), MetricsError> {
    let days = &summary.performance.days;
    let (Some(first), Some(last)) = (days.first(), days.last()) else {
        return Err(MetricsError::EmptySummary {
            check: summary.check.name.clone(),
        });
    };

    let first_date =
        DateTime::from_timestamp(first.starttime, 0).ok_or(MetricsError::DateOutOfRange)?;
    let last_date =
        DateTime::from_timestamp(last.starttime, 0).ok_or(MetricsError::DateOutOfRange)?;

    Ok((first_date, last_date))
}
