//! Splits outage intervals into per-day downtime.

use super::DayClock;
use crate::provider::{OutageState, TimeWindow};

use chrono::{DateTime, Days, Utc};

/// A continuous down period `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutageInterval {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl OutageInterval {
    /// Interval of a `down` state, `None` for any other status or for
    /// timestamps chrono cannot represent.
    pub fn from_state(state: &OutageState) -> Option<Self> {
        if !state.is_down() {
            return None;
        }

        let from = DateTime::from_timestamp(state.timefrom, 0)?;
        let to = DateTime::from_timestamp(state.timeto, 0)?;
        Some(Self { from, to })
    }
}

/// Distribute down time across the calendar days of `window`.
///
/// Returns one bucket per calendar day between `window.from` and
/// `window.to`, in milliseconds, index 0 being the day containing
/// `window.from`. Intervals are walked midnight by midnight, so an outage
/// spanning several days adds to every day it touches. Portions outside the
/// window are dropped.
pub fn split_downtime(clock: &DayClock, window: &TimeWindow, states: &[OutageState]) -> Vec<i64> {
    let days = clock.days_between(window.from, window.to).max(0) as usize;
    let mut buckets = vec![0i64; days];
    if days == 0 {
        return buckets;
    }

    let first_day = clock.date_of(window.from);
    let Some(last_day) = first_day.checked_add_days(Days::new(days as u64)) else {
        return buckets;
    };
    let (Some(span_start), Some(span_end)) =
        (clock.start_of_day(first_day), clock.start_of_day(last_day))
    else {
        return buckets;
    };

    for state in states.iter().filter(|s| s.is_down()) {
        let Some(interval) = OutageInterval::from_state(state) else {
            tracing::warn!(
                "Skipping outage with invalid bounds {}..{}",
                state.timefrom,
                state.timeto
            );
            continue;
        };

        let mut start = interval.from.max(span_start);
        let end = interval.to.min(span_end);

        while start < end {
            let day = clock.date_of(start);
            let Some(next_midnight) = day.succ_opt().and_then(|next| clock.start_of_day(next))
            else {
                break;
            };
            let slice_end = end.min(next_midnight);

            let index = day.signed_duration_since(first_day).num_days();
            if let Some(bucket) = usize::try_from(index).ok().and_then(|i| buckets.get_mut(i)) {
                *bucket += (slice_end - start).num_milliseconds();
            }

            start = slice_end;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    const HOUR_MS: i64 = 3_600_000;

    fn ts(d: u32, h: u32, m: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap().timestamp()
    }

    fn down(from: i64, to: i64) -> OutageState {
        OutageState {
            status: "down".to_string(),
            timefrom: from,
            timeto: to,
        }
    }

    fn window(days: u32) -> TimeWindow {
        DayClock::utc()
            .days_window(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), days)
            .unwrap()
    }

    #[test]
    fn test_interval_within_one_day() {
        let states = vec![down(ts(11, 9, 0), ts(11, 9, 30))];
        let buckets = split_downtime(&DayClock::utc(), &window(3), &states);
        assert_eq!(buckets, vec![0, HOUR_MS / 2, 0]);
    }

    #[test]
    fn test_interval_crossing_midnight() {
        // 14:00 on day 0 to 02:00 on day 1
        let states = vec![down(ts(10, 14, 0), ts(11, 2, 0))];
        let buckets = split_downtime(&DayClock::utc(), &window(2), &states);
        assert_eq!(buckets, vec![10 * HOUR_MS, 2 * HOUR_MS]);
    }

    #[test]
    fn test_interval_spanning_three_days() {
        let states = vec![down(ts(10, 20, 0), ts(12, 6, 0))];
        let buckets = split_downtime(&DayClock::utc(), &window(4), &states);
        assert_eq!(buckets, vec![4 * HOUR_MS, 24 * HOUR_MS, 6 * HOUR_MS, 0]);
    }

    #[test]
    fn test_only_down_states_count() {
        let mut up = down(ts(10, 0, 0), ts(10, 12, 0));
        up.status = "up".to_string();
        let states = vec![up, down(ts(10, 12, 0), ts(10, 13, 0))];
        let buckets = split_downtime(&DayClock::utc(), &window(1), &states);
        assert_eq!(buckets, vec![HOUR_MS]);
    }

    #[test]
    fn test_outages_accumulate() {
        let states = vec![
            down(ts(10, 1, 0), ts(10, 2, 0)),
            down(ts(10, 5, 0), ts(10, 7, 0)),
        ];
        let buckets = split_downtime(&DayClock::utc(), &window(1), &states);
        assert_eq!(buckets, vec![3 * HOUR_MS]);
    }

    #[test]
    fn test_portions_outside_window_are_dropped() {
        let states = vec![
            down(ts(9, 22, 0), ts(10, 1, 0)),
            down(ts(11, 23, 0), ts(12, 3, 0)),
        ];
        let buckets = split_downtime(&DayClock::utc(), &window(2), &states);
        assert_eq!(buckets, vec![HOUR_MS, HOUR_MS]);
    }

    #[test]
    fn test_day_boundaries_follow_clock_offset() {
        // UTC+01:00: local midnight of Mar 11 is 23:00 UTC on Mar 10
        let clock = DayClock::from_minutes(60).unwrap();
        let window = clock
            .days_window(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(), 2)
            .unwrap();
        let states = vec![down(ts(10, 22, 0), ts(11, 1, 0))];
        let buckets = split_downtime(&clock, &window, &states);
        assert_eq!(buckets, vec![HOUR_MS, 2 * HOUR_MS]);
    }

    #[test]
    fn test_inverted_interval_adds_nothing() {
        let states = vec![down(ts(10, 5, 0), ts(10, 4, 0))];
        let buckets = split_downtime(&DayClock::utc(), &window(1), &states);
        assert_eq!(buckets, vec![0]);
    }

    #[test]
    fn test_empty_window() {
        let clock = DayClock::utc();
        let instant = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let window = TimeWindow::new(instant, instant);
        assert!(split_downtime(&clock, &window, &[down(0, 60)]).is_empty());
    }
}
