use serde::{Deserialize, Serialize};

use crate::{HourOfDay, MetricSelector};

/// Judgment on whether the diurnal shape repeats across days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeStability {
    /// Within-day structure repeats from day to day
    Stable,
    /// Across-day variation dominates and daily curves correlate poorly
    Unstable,
    /// Not enough data for one of the inputs to the judgment
    Undetermined,
}

impl ShapeStability {
    pub fn is_stable(&self) -> Option<bool> {
        match self {
            ShapeStability::Stable => Some(true),
            ShapeStability::Unstable => Some(false),
            ShapeStability::Undetermined => None,
        }
    }
}

/// Intra-day vs inter-day decomposition of one metric's day x hour grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceStats {
    pub metric: MetricSelector,
    /// Days with at least one observed hour
    pub day_count: usize,
    /// Days that contributed an intraday CV
    pub qualifying_days: usize,
    pub mean_intraday_cv: Option<f64>,
    pub std_intraday_cv: Option<f64>,
    /// Hours of day that contributed an interday CV
    pub qualifying_hours: usize,
    pub mean_interday_cv: Option<f64>,
    /// Day pairs that produced a defined correlation
    pub correlated_pairs: usize,
    pub pairwise_daily_correlation_mean: Option<f64>,
    pub pairwise_daily_correlation_std: Option<f64>,
    /// CV across every observed (day, hour) cell
    pub global_cv: Option<f64>,
    pub shape_stability: ShapeStability,
}

/// Across-day statistics of one hour of day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourProfile {
    pub hour: HourOfDay,
    pub days_observed: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

/// Whether the tracked statistic moves with the hour of day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiurnalVariation {
    /// Sample std of the statistic across observed hour-of-day bins
    pub std_across_hours: Option<f64>,
    pub varies_by_hour: Option<bool>,
}

/// Characterisation of a window series (one value per retained trace window)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub p10: Option<f64>,
    pub p90: Option<f64>,
    pub cv: Option<f64>,
}
