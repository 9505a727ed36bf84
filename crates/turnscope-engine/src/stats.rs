//! Numeric helpers shared by the aggregator, the binner and the variance
//! decomposer.
//!
//! Every helper returns `None` when its statistic is undefined for the input
//! (too few points, zero variance, non-positive mean) instead of a default.

use turnscope_types::SeriesStats;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sum_squared_deviations(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Standard deviation with Bessel's correction (n - 1); needs two points
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    Some((sum_squared_deviations(values, m) / (values.len() - 1) as f64).sqrt())
}

/// Standard deviation over n; needs one point
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some((sum_squared_deviations(values, m) / values.len() as f64).sqrt())
}

/// Sample std divided by mean; undefined unless the mean is positive
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if m <= 0.0 {
        return None;
    }
    sample_std(values).map(|sd| sd / m)
}

pub fn range(values: &[f64]) -> Option<f64> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    Some(max - min)
}

pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Exact quantile of an ascending slice, linear interpolation between the
/// closest ranks (`pos = q * (n - 1)`).
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Pearson correlation; undefined for fewer than two pairs or a constant side
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Characterise a series of per-window values
pub fn series_stats(values: &[f64]) -> SeriesStats {
    let ordered = sorted(values);
    SeriesStats {
        count: values.len(),
        mean: mean(values),
        std: sample_std(values),
        p10: quantile_sorted(&ordered, 0.10),
        p90: quantile_sorted(&ordered, 0.90),
        cv: coefficient_of_variation(values),
    }
}
