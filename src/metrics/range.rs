//! Range merging: fan out one day pipeline per day and align the results
//! into per-check series.

use super::{DayMetric, DayValue, Metrics, MetricsError, TimeSeries};
use crate::provider::MonitoringProvider;

use chrono::{Days, NaiveDate};
use futures_util::future::try_join_all;
use std::collections::HashMap;

impl<P: MonitoringProvider> Metrics<P> {
    /// Aggregate `range` calendar days ending on `reference` into one series
    /// per check, oldest day first.
    ///
    /// Days are fetched concurrently and the first failure aborts the whole
    /// merge.
    pub async fn merge_range(
        &self,
        reference: NaiveDate,
        range: u32,
        metric: DayMetric,
    ) -> Result<Vec<TimeSeries>, MetricsError> {
        if range == 0 {
            return Err(MetricsError::EmptyRange);
        }

        let mut days = (0..range)
            .map(|offset| {
                reference
                    .checked_sub_days(Days::new(offset as u64))
                    .ok_or(MetricsError::DateOutOfRange)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            "Merging {:?} over {} days ending {}",
            metric,
            range,
            reference
        );

        let fetches = days.iter().map(|&day| self.day_values(day, metric));
        let mut per_day = try_join_all(fetches).await?;

        // Offset 0 is the most recent day
        days.reverse();
        per_day.reverse();

        zip_days(&days, per_day)
    }
}

/// Merge per-day values into per-check series keyed by check id.
///
/// `per_day[i]` holds the values for `days[i]`. The first day fixes the
/// series order and the set of checks; any later day listing a different
/// set fails with [`MetricsError::MisalignedDay`].
pub fn zip_days(
    days: &[NaiveDate],
    per_day: Vec<Vec<DayValue>>,
) -> Result<Vec<TimeSeries>, MetricsError> {
    let mut per_day = per_day.into_iter();
    let Some(first) = per_day.next() else {
        return Ok(Vec::new());
    };

    let mut index: HashMap<i64, usize> = HashMap::with_capacity(first.len());
    let mut series: Vec<TimeSeries> = Vec::with_capacity(first.len());
    for value in first {
        if index.insert(value.check.id, series.len()).is_some() {
            return Err(MetricsError::MisalignedDay {
                date: value.bucket.date,
                expected: series.len(),
                found: series.len() + 1,
            });
        }
        series.push(TimeSeries {
            points: vec![value.bucket],
            check: value.check,
        });
    }

    for (offset, values) in per_day.enumerate() {
        let date = days
            .get(offset + 1)
            .copied()
            .or_else(|| values.first().map(|v| v.bucket.date))
            .ok_or(MetricsError::DateOutOfRange)?;

        let misaligned = MetricsError::MisalignedDay {
            date,
            expected: series.len(),
            found: values.len(),
        };
        if values.len() != series.len() {
            return Err(misaligned);
        }

        let day_len = offset + 2;
        for value in values {
            let Some(points) = index.get(&value.check.id).map(|&i| &mut series[i].points) else {
                return Err(misaligned);
            };
            // A second value for the same check on one day
            if points.len() == day_len {
                return Err(misaligned);
            }
            points.push(value.bucket);
        }
    }

    Ok(series)
}
