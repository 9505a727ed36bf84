use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use turnscope_engine::stats::series_stats;
use turnscope_engine::{
    DayHourGrid, DayHourScheme, HourOfDayScheme, TraceWindowScheme, aggregate_sessions,
    bin_sessions, decompose, diurnal_profile, diurnal_variation, filter_sparse_bins, segment,
};
use turnscope_types::{
    AnalysisConfig, BinTable, DayHour, HourProfile, Metric, MetricSelector, ParameterSet, Record,
    Segmentation, SensitivityResult, SeriesStats, Statistic, VarianceStats,
};

/// Everything one parameter set produces, beyond the sweep comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: SensitivityResult,
    pub by_day_hour: BinTable<DayHour>,
    /// One decomposition per selector: the configured one first, then the
    /// mean of every other metric
    pub variance: Vec<VarianceStats>,
    /// Across-day profile of the configured selector
    pub diurnal_profile: Vec<HourProfile>,
    /// Selected statistic across the retained trace windows
    pub window_series: SeriesStats,
}

impl AnalysisReport {
    pub fn variance_for(&self, selector: MetricSelector) -> Option<&VarianceStats> {
        self.variance.iter().find(|stats| stats.metric == selector)
    }
}

/// Selectors decomposed by [`analyze`], configured selector first, without repeats
fn variance_selectors(config: &AnalysisConfig) -> Vec<MetricSelector> {
    let mut selectors = vec![config.selector];
    for metric in Metric::ALL {
        let selector = MetricSelector::new(metric, Statistic::Mean);
        if !selectors.contains(&selector) {
            selectors.push(selector);
        }
    }
    selectors
}

/// Segment, aggregate and bin one record snapshot under one parameter set.
pub fn run_pipeline(
    records: &[Record],
    parameters: &ParameterSet,
    config: &AnalysisConfig,
) -> Result<SensitivityResult> {
    let (_, result) = run_segmented(records, parameters, config)?;
    Ok(result)
}

fn run_segmented(
    records: &[Record],
    parameters: &ParameterSet,
    config: &AnalysisConfig,
) -> Result<(Segmentation, SensitivityResult)> {
    config.validate()?;
    parameters.validate()?;
    let window_scheme = TraceWindowScheme::new(parameters.bin_width)?;
    let thresholds = config.sorted_thresholds();

    let segmentation = segment(records, parameters.gap_threshold)?;
    let sessions = &segmentation.sessions;

    let summary = aggregate_sessions(sessions, &thresholds);
    let by_hour = bin_sessions(sessions, &HourOfDayScheme, &thresholds);
    let windows = filter_sparse_bins(
        bin_sessions(sessions, &window_scheme, &thresholds),
        parameters.min_support,
    );
    let hour_variation =
        diurnal_variation(&by_hour, config.selector, config.hour_variation_threshold);

    debug!(
        parameters = %parameters.label(),
        sessions = summary.session_count,
        hour_bins = by_hour.len(),
        windows_kept = windows.kept.len(),
        windows_dropped = windows.dropped,
        "pipeline run complete"
    );

    let result = SensitivityResult {
        parameters: *parameters,
        record_count: records.len(),
        summary,
        by_hour,
        by_window: windows.kept,
        sparse_windows_dropped: windows.dropped,
        hour_variation,
    };
    Ok((segmentation, result))
}

/// Run the pipeline once and add the day x hour variance analysis.
pub fn analyze(
    records: &[Record],
    parameters: &ParameterSet,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    let (segmentation, result) = run_segmented(records, parameters, config)?;

    let by_day_hour = bin_sessions(
        &segmentation.sessions,
        &DayHourScheme,
        &config.sorted_thresholds(),
    );
    let variance: Vec<VarianceStats> = variance_selectors(config)
        .into_iter()
        .map(|selector| {
            let grid = DayHourGrid::from_bins(&by_day_hour, selector);
            decompose(&grid, &config.variance)
        })
        .collect();
    let diurnal_profile = diurnal_profile(&DayHourGrid::from_bins(&by_day_hour, config.selector));

    let window_values: Vec<f64> = result
        .by_window
        .iter()
        .filter_map(|bin| bin.value(config.selector))
        .collect();
    let window_series = series_stats(&window_values);

    info!(
        parameters = %parameters.label(),
        sessions = result.summary.session_count,
        decompositions = variance.len(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        result,
        by_day_hour,
        variance,
        diurnal_profile,
        window_series,
    })
}
