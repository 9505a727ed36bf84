use std::collections::BTreeMap;

use turnscope_types::{DayHour, HOURS_PER_DAY, HourOfDay, MetricSelector, TimeBin};

/// One row of 24 hour slots per calendar day; `None` marks an unobserved cell.
pub type DayRow = [Option<f64>; HOURS_PER_DAY];

/// Values of one metric statistic on a (day, hour-of-day) grid.
///
/// Only days with at least one observed cell have a row.
#[derive(Debug, Clone, PartialEq)]
pub struct DayHourGrid {
    selector: MetricSelector,
    rows: BTreeMap<i64, DayRow>,
}

impl DayHourGrid {
    pub fn new(selector: MetricSelector) -> Self {
        Self {
            selector,
            rows: BTreeMap::new(),
        }
    }

    /// Project day x hour bins onto the selected statistic.
    ///
    /// Bins whose statistic is undefined leave their cell empty.
    pub fn from_bins(bins: &[TimeBin<DayHour>], selector: MetricSelector) -> Self {
        Self::from_cells(
            selector,
            bins.iter()
                .filter_map(|bin| bin.value(selector).map(|value| (bin.key, value))),
        )
    }

    pub fn from_cells<I>(selector: MetricSelector, cells: I) -> Self
    where
        I: IntoIterator<Item = (DayHour, f64)>,
    {
        let mut grid = Self::new(selector);
        for (key, value) in cells {
            grid.insert(key, value);
        }
        grid
    }

    /// Set a cell; non-finite values are ignored
    pub fn insert(&mut self, key: DayHour, value: f64) {
        if !value.is_finite() {
            return;
        }
        let row = self.rows.entry(key.day).or_insert([None; HOURS_PER_DAY]);
        row[key.hour.index()] = Some(value);
    }

    pub fn selector(&self) -> MetricSelector {
        self.selector
    }

    pub fn day_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = (i64, &DayRow)> {
        self.rows.iter().map(|(&day, row)| (day, row))
    }

    pub fn value(&self, key: DayHour) -> Option<f64> {
        self.rows.get(&key.day).and_then(|row| row[key.hour.index()])
    }

    /// Every observed cell value, day-major
    pub fn observed_values(&self) -> Vec<f64> {
        self.rows
            .values()
            .flat_map(|row| row.iter().flatten().copied())
            .collect()
    }

    /// Observed values of one hour across days, in day order
    pub fn hour_column(&self, hour: HourOfDay) -> Vec<f64> {
        self.rows
            .values()
            .filter_map(|row| row[hour.index()])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(day: i64, hour: u8) -> DayHour {
        DayHour::new(day, HourOfDay::new(hour).unwrap())
    }

    #[test]
    fn test_cells_land_in_day_rows() {
        let grid = DayHourGrid::from_cells(
            MetricSelector::mean_turns(),
            vec![(key(3, 1), 2.0), (key(1, 5), 4.0), (key(3, 5), 6.0)],
        );

        assert_eq!(grid.day_count(), 2);
        assert_eq!(grid.value(key(3, 1)), Some(2.0));
        assert_eq!(grid.value(key(3, 2)), None);
        assert_eq!(grid.value(key(2, 1)), None);
        assert_eq!(grid.hour_column(HourOfDay::new(5).unwrap()), vec![4.0, 6.0]);
        assert_eq!(grid.observed_values(), vec![4.0, 2.0, 6.0]);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let mut grid = DayHourGrid::new(MetricSelector::mean_turns());
        grid.insert(key(0, 0), f64::NAN);
        assert_eq!(grid.day_count(), 0);
    }
}
