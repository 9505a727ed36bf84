use serde::{Deserialize, Serialize};

use crate::{Error, MetricSelector, Result, Statistic};

pub const DEFAULT_GAP_THRESHOLDS: [f64; 3] = [900.0, 1_800.0, 3_600.0];
pub const DEFAULT_GAP_THRESHOLD: f64 = 1_800.0;
pub const DEFAULT_BIN_WIDTH: u64 = 3_600;
pub const DEFAULT_MIN_SUPPORT: usize = 100;
pub const DEFAULT_FRACTION_THRESHOLDS: [u32; 2] = [2, 3];

/// Heuristic parameters of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Maximum idle seconds between grouped records of one session
    pub gap_threshold: f64,
    /// Width in seconds of the fixed trace windows
    pub bin_width: u64,
    /// Minimum sessions a trace window needs to be retained
    pub min_support: usize,
}

impl ParameterSet {
    pub fn new(gap_threshold: f64, bin_width: u64, min_support: usize) -> Self {
        Self {
            gap_threshold,
            bin_width,
            min_support,
        }
    }

    pub fn with_gap(gap_threshold: f64) -> Self {
        Self {
            gap_threshold,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.gap_threshold.is_finite() && self.gap_threshold > 0.0) {
            return Err(Error::configuration(format!(
                "gap_threshold must be a positive number of seconds, got {}",
                self.gap_threshold
            )));
        }
        if self.bin_width == 0 {
            return Err(Error::configuration("bin_width must be positive"));
        }
        if i64::try_from(self.bin_width).is_err() {
            return Err(Error::configuration(format!(
                "bin_width must be at most {} seconds, got {}",
                i64::MAX,
                self.bin_width
            )));
        }
        Ok(())
    }

    /// Short label used in logs and text output, e.g. `gap=1800s width=3600s min=100`
    pub fn label(&self) -> String {
        format!(
            "gap={}s width={}s min={}",
            self.gap_threshold, self.bin_width, self.min_support
        )
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            gap_threshold: DEFAULT_GAP_THRESHOLD,
            bin_width: DEFAULT_BIN_WIDTH,
            min_support: DEFAULT_MIN_SUPPORT,
        }
    }
}

/// Axes of a sensitivity sweep; expands to their cartesian product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterGrid {
    pub gap_thresholds: Vec<f64>,
    pub bin_widths: Vec<u64>,
    pub min_supports: Vec<usize>,
}

impl ParameterGrid {
    /// Parameter sets in gap-major order (gap, then width, then support)
    pub fn expand(&self) -> Vec<ParameterSet> {
        let mut sets = Vec::with_capacity(
            self.gap_thresholds.len() * self.bin_widths.len() * self.min_supports.len(),
        );
        for &gap in &self.gap_thresholds {
            for &width in &self.bin_widths {
                for &support in &self.min_supports {
                    sets.push(ParameterSet::new(gap, width, support));
                }
            }
        }
        sets
    }
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self {
            gap_thresholds: DEFAULT_GAP_THRESHOLDS.to_vec(),
            bin_widths: vec![DEFAULT_BIN_WIDTH],
            min_supports: vec![DEFAULT_MIN_SUPPORT],
        }
    }
}

/// Settings of the day x hour variance decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VarianceConfig {
    /// Observed hours a day needs before its intraday CV counts
    pub min_day_hours: usize,
    /// Shared observed hours two days need before they are correlated
    pub min_overlap_hours: usize,
    /// Mean pairwise correlation below which the diurnal shape counts as low
    pub correlation_threshold: f64,
}

impl Default for VarianceConfig {
    fn default() -> Self {
        Self {
            min_day_hours: 6,
            min_overlap_hours: 6,
            correlation_threshold: 0.4,
        }
    }
}

/// Configuration shared by every pipeline run.
///
/// Passed explicitly to each run so parallel runs never share mutable defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// k values for the "fraction of sessions with turn_count >= k" aggregates
    pub fraction_thresholds: Vec<u32>,
    /// Std across hour-of-day bins above which depth is judged time-varying
    pub hour_variation_threshold: f64,
    /// Largest fraction spread across a sweep still judged robust
    pub robustness_tolerance: f64,
    /// Statistic tracked across hours, windows, days and sweep runs
    pub selector: MetricSelector,
    pub variance: VarianceConfig,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fraction_thresholds.is_empty() {
            return Err(Error::configuration(
                "fraction_thresholds must contain at least one k",
            ));
        }
        if self.fraction_thresholds.contains(&0) {
            return Err(Error::configuration("fraction thresholds must be >= 1"));
        }
        if !(self.hour_variation_threshold.is_finite() && self.hour_variation_threshold >= 0.0) {
            return Err(Error::configuration(
                "hour_variation_threshold must be a non-negative number",
            ));
        }
        if !(self.robustness_tolerance.is_finite() && self.robustness_tolerance >= 0.0) {
            return Err(Error::configuration(
                "robustness_tolerance must be a non-negative number",
            ));
        }
        if self.variance.min_overlap_hours < 2 {
            return Err(Error::configuration(
                "variance.min_overlap_hours must be at least 2",
            ));
        }
        if !self.variance.correlation_threshold.is_finite() {
            return Err(Error::configuration(
                "variance.correlation_threshold must be a finite number",
            ));
        }
        self.validate_selector()
    }

    /// The selector must name a statistic every summary of its metric carries
    fn validate_selector(&self) -> Result<()> {
        let Statistic::FractionAtLeast(k) = self.selector.statistic else {
            return Ok(());
        };
        if !self.selector.metric.has_fractions() {
            return Err(Error::configuration(format!(
                "selector {}: {} has no fraction aggregates",
                self.selector, self.selector.metric
            )));
        }
        if !self.fraction_thresholds.contains(&k) {
            return Err(Error::configuration(format!(
                "selector {}: k={} is not in fraction_thresholds {:?}",
                self.selector, k, self.fraction_thresholds
            )));
        }
        Ok(())
    }

    /// Thresholds sorted ascending with duplicates removed
    pub fn sorted_thresholds(&self) -> Vec<u32> {
        let mut ks = self.fraction_thresholds.clone();
        ks.sort_unstable();
        ks.dedup();
        ks
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fraction_thresholds: DEFAULT_FRACTION_THRESHOLDS.to_vec(),
            hour_variation_threshold: 0.05,
            robustness_tolerance: 0.01,
            selector: MetricSelector::default(),
            variance: VarianceConfig::default(),
        }
    }
}
