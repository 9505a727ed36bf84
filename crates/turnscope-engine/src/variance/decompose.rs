use tracing::debug;
use turnscope_types::{HourOfDay, HourProfile, ShapeStability, VarianceConfig, VarianceStats};

use super::grid::{DayHourGrid, DayRow};
use crate::stats::{coefficient_of_variation, mean, pearson, population_std, sample_std};

/// Split the variation of a day x hour grid into its within-day and
/// across-day parts and judge whether the diurnal shape repeats.
///
/// Every statistic is `None` when no day, hour or day pair qualifies.
pub fn decompose(grid: &DayHourGrid, config: &VarianceConfig) -> VarianceStats {
    let intraday = intraday_cvs(grid, config.min_day_hours.max(2));
    let interday = interday_cvs(grid);
    let correlations = pairwise_correlations(grid, config.min_overlap_hours.max(2));

    let mean_intraday_cv = mean(&intraday);
    let mean_interday_cv = mean(&interday);
    let pairwise_daily_correlation_mean = mean(&correlations);

    let shape_stability = judge_shape(
        mean_intraday_cv,
        mean_interday_cv,
        pairwise_daily_correlation_mean,
        config.correlation_threshold,
    );

    debug!(
        days = grid.day_count(),
        qualifying_days = intraday.len(),
        qualifying_hours = interday.len(),
        pairs = correlations.len(),
        ?shape_stability,
        "decomposed day x hour variance"
    );

    VarianceStats {
        metric: grid.selector(),
        day_count: grid.day_count(),
        qualifying_days: intraday.len(),
        mean_intraday_cv,
        std_intraday_cv: sample_std(&intraday),
        qualifying_hours: interday.len(),
        mean_interday_cv,
        correlated_pairs: correlations.len(),
        pairwise_daily_correlation_mean,
        pairwise_daily_correlation_std: population_std(&correlations),
        global_cv: coefficient_of_variation(&grid.observed_values()),
        shape_stability,
    }
}

/// Mean and sample std of each hour of day across the days it was observed on.
///
/// Always 24 entries, hour 0 first.
pub fn diurnal_profile(grid: &DayHourGrid) -> Vec<HourProfile> {
    HourOfDay::all()
        .map(|hour| {
            let column = grid.hour_column(hour);
            HourProfile {
                hour,
                days_observed: column.len(),
                mean: mean(&column),
                std: sample_std(&column),
            }
        })
        .collect()
}

fn observed(row: &DayRow) -> Vec<f64> {
    row.iter().flatten().copied().collect()
}

fn intraday_cvs(grid: &DayHourGrid, min_hours: usize) -> Vec<f64> {
    grid.rows()
        .map(|(_, row)| observed(row))
        .filter(|values| values.len() >= min_hours)
        .filter_map(|values| coefficient_of_variation(&values))
        .collect()
}

fn interday_cvs(grid: &DayHourGrid) -> Vec<f64> {
    HourOfDay::all()
        .map(|hour| grid.hour_column(hour))
        .filter(|column| column.len() >= 2)
        .filter_map(|column| coefficient_of_variation(&column))
        .collect()
}

fn pairwise_correlations(grid: &DayHourGrid, min_overlap: usize) -> Vec<f64> {
    let rows: Vec<&DayRow> = grid.rows().map(|(_, row)| row).collect();
    let mut correlations = Vec::new();

    for (i, left) in rows.iter().enumerate() {
        for right in &rows[i + 1..] {
            let (xs, ys): (Vec<f64>, Vec<f64>) = left
                .iter()
                .zip(right.iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            if xs.len() < min_overlap {
                continue;
            }
            if let Some(r) = pearson(&xs, &ys) {
                correlations.push(r);
            }
        }
    }
    correlations
}

fn judge_shape(
    intraday: Option<f64>,
    interday: Option<f64>,
    correlation: Option<f64>,
    threshold: f64,
) -> ShapeStability {
    match (intraday, interday, correlation) {
        (Some(intra), Some(inter), Some(r)) if inter >= intra && r < threshold => {
            ShapeStability::Unstable
        }
        (Some(_), Some(_), Some(_)) => ShapeStability::Stable,
        _ => ShapeStability::Undetermined,
    }
}
