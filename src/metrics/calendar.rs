//! Calendar-day arithmetic.

use crate::provider::TimeWindow;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Offset, TimeDelta, Utc};

/// Maps instants to calendar days in a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClock {
    offset: FixedOffset,
}

impl Default for DayClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Build a clock from an offset in minutes east of UTC.
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::new)
    }

    /// Calendar date containing `instant`.
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// First instant of `date`, `None` when it falls outside chrono's range.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        local_midnight
            .checked_sub_signed(TimeDelta::seconds(self.offset.local_minus_utc() as i64))
            .map(|utc| utc.and_utc())
    }

    /// Number of midnights between the days of `from` and `to`.
    ///
    /// Counts calendar dates, not elapsed 24h periods: 23:59 to 00:01 the
    /// next day is one day apart.
    pub fn days_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        self.date_of(to)
            .signed_duration_since(self.date_of(from))
            .num_days()
    }

    /// Window covering exactly one calendar day.
    pub fn day_window(&self, date: NaiveDate) -> Option<TimeWindow> {
        self.days_window(date, 1)
    }

    /// Window covering `days` calendar days starting at `first`.
    pub fn days_window(&self, first: NaiveDate, days: u32) -> Option<TimeWindow> {
        let end = first.checked_add_days(Days::new(days as u64))?;
        Some(TimeWindow::new(
            self.start_of_day(first)?,
            self.start_of_day(end)?,
        ))
    }

    /// Today's date in this clock's offset.
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_between_counts_midnights() {
        let clock = DayClock::utc();
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 1, 2, 0, 1, 0).unwrap();
        assert_eq!(clock.days_between(late, early), 1);

        let morning = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(clock.days_between(morning, late), 0);
        assert_eq!(clock.days_between(early, morning), -1);
    }

    #[test]
    fn test_start_of_day_with_offset() {
        // UTC+02:00: local midnight on Jan 2 is 22:00 UTC on Jan 1
        let clock = DayClock::from_minutes(120).unwrap();
        assert_eq!(
            clock.start_of_day(date(2024, 1, 2)),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap())
        );

        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 23, 0, 0).unwrap();
        assert_eq!(clock.date_of(instant), date(2024, 1, 2));
    }

    #[test]
    fn test_days_window() {
        let clock = DayClock::utc();
        let window = clock.days_window(date(2024, 2, 28), 2).unwrap();
        assert_eq!(window.from, Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap());
        assert_eq!(window.to, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(clock.days_between(window.from, window.to), 2);
    }

    #[test]
    fn test_invalid_offset() {
        assert!(DayClock::from_minutes(24 * 60).is_none());
        assert!(DayClock::from_minutes(-330).is_some());
    }

    #[test]
    fn test_windows_at_the_edge_of_the_calendar() {
        // Local midnight of the first representable day lies before it in UTC
        let clock = DayClock::from_minutes(120).unwrap();
        assert!(clock.start_of_day(NaiveDate::MIN).is_none());
        assert!(clock.day_window(NaiveDate::MIN).is_none());
        assert!(clock.day_window(NaiveDate::MAX).is_none());

        let utc = DayClock::utc();
        assert!(utc.start_of_day(NaiveDate::MIN).is_some());
    }
}
