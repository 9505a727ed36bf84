use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{Metric, MetricSelector, MetricSummary, SessionAggregate};

pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const HOURS_PER_DAY: usize = 24;

/// Hour of day in `[0, 23]`, independent of the calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Returns `None` outside `[0, 23]`
    pub fn new(hour: u8) -> Option<Self> {
        (usize::from(hour) < HOURS_PER_DAY).then_some(Self(hour))
    }

    pub fn of(timestamp: f64) -> Self {
        let seconds_into_day = timestamp.rem_euclid(SECONDS_PER_DAY as f64);
        let hour = (seconds_into_day / SECONDS_PER_HOUR as f64).floor() as u8;
        // rem_euclid may round up to exactly 86400 for tiny negative inputs
        Self(hour.min(HOURS_PER_DAY as u8 - 1))
    }

    pub fn all() -> impl Iterator<Item = HourOfDay> {
        (0..HOURS_PER_DAY as u8).map(HourOfDay)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}h", self.0)
    }
}

/// Start of a fixed-width window along the trace, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowStart(pub i64);

impl WindowStart {
    /// Start of the window holding `timestamp`, saturating at the ends of the i64 range
    pub fn of(timestamp: f64, width: u64) -> Self {
        let width = i64::try_from(width).unwrap_or(i64::MAX);
        let index = (timestamp / width as f64).floor() as i64;
        Self(index.saturating_mul(width))
    }

    pub fn seconds(self) -> i64 {
        self.0
    }
}

impl fmt::Display for WindowStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calendar day (days since the epoch) crossed with hour of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayHour {
    pub day: i64,
    pub hour: HourOfDay,
}

impl DayHour {
    pub fn new(day: i64, hour: HourOfDay) -> Self {
        Self { day, hour }
    }

    pub fn of(timestamp: f64) -> Self {
        Self {
            day: (timestamp / SECONDS_PER_DAY as f64).floor() as i64,
            hour: HourOfDay::of(timestamp),
        }
    }

    /// UTC calendar date of the day index
    pub fn date(&self) -> Option<NaiveDate> {
        let midnight = self.day.checked_mul(SECONDS_PER_DAY)?;
        DateTime::from_timestamp(midnight, 0).map(|dt| dt.date_naive())
    }
}

impl fmt::Display for DayHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date() {
            Some(date) => write!(f, "{} {}", date, self.hour),
            None => write!(f, "day{} {}", self.day, self.hour),
        }
    }
}

/// Aggregates for the sessions sharing one bin key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBin<K> {
    pub key: K,
    pub session_count: usize,
    pub metrics: BTreeMap<Metric, MetricSummary>,
}

impl<K> TimeBin<K> {
    pub fn new(key: K, aggregate: SessionAggregate) -> Self {
        Self {
            key,
            session_count: aggregate.session_count,
            metrics: aggregate.metrics,
        }
    }

    pub fn summary(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.get(&metric)
    }

    pub fn value(&self, selector: MetricSelector) -> Option<f64> {
        self.summary(selector.metric)
            .and_then(|summary| summary.statistic(selector.statistic))
    }
}

/// Bins for one keying scheme, in ascending key order; only observed keys appear
pub type BinTable<K> = Vec<TimeBin<K>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_of_day_wraps_across_days() {
        assert_eq!(HourOfDay::of(3_700.0).get(), 1);
        assert_eq!(HourOfDay::of(90_000.0).get(), 1);
        assert_eq!(HourOfDay::of(86_399.9).get(), 23);
        assert_eq!(HourOfDay::of(0.0).get(), 0);
    }

    #[test]
    fn test_hour_of_day_bounds() {
        assert!(HourOfDay::new(23).is_some());
        assert!(HourOfDay::new(24).is_none());
        assert_eq!(HourOfDay::all().count(), 24);
    }

    #[test]
    fn test_window_start_floors_to_width() {
        assert_eq!(WindowStart::of(0.0, 3_600), WindowStart(0));
        assert_eq!(WindowStart::of(3_599.9, 3_600), WindowStart(0));
        assert_eq!(WindowStart::of(3_600.0, 3_600), WindowStart(3_600));
        assert_eq!(WindowStart::of(7_250.0, 900), WindowStart(7_200));
    }

    #[test]
    fn test_window_start_saturates() {
        assert_eq!(WindowStart::of(1e12, u64::MAX), WindowStart(0));
        assert_eq!(WindowStart::of(1e300, 1 << 40), WindowStart(i64::MAX));
    }

    #[test]
    fn test_day_hour_date() {
        let key = DayHour::of(86_400.0 * 3.0 + 7_200.0);
        assert_eq!(key.day, 3);
        assert_eq!(key.hour.get(), 2);
        assert_eq!(key.date(), NaiveDate::from_ymd_opt(1970, 1, 4));
        assert_eq!(key.to_string(), "1970-01-04 02h");
    }
}
