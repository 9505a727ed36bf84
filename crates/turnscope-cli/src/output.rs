use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;
use turnscope_runtime::AnalysisReport;
use turnscope_types::{MetricSelector, SweepReport, SweepRun, SweepScalar, VarianceStats};

use crate::types::OutputFormat;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn emit_analysis(
    report: &AnalysisReport,
    selector: MetricSelector,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            println!("{}", render_analysis(report, selector));
            Ok(())
        }
    }
}

pub fn emit_sweep(report: &SweepReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            println!("{}", render_sweep(report));
            Ok(())
        }
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3}", v),
        None => "-".to_string(),
    }
}

fn fmt_judgment(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "undetermined",
    }
}

pub fn render_analysis(report: &AnalysisReport, selector: MetricSelector) -> String {
    let result = &report.result;
    let mut out = String::new();

    let _ = writeln!(out, "parameters: {}", result.parameters.label());
    let _ = writeln!(
        out,
        "records: {}  sessions: {}",
        result.record_count, result.summary.session_count
    );
    for (metric, summary) in &result.summary.metrics {
        let _ = write!(
            out,
            "{}: mean={:.3} median={:.3} p90={:.3} p95={:.3}",
            metric, summary.mean, summary.median, summary.p90, summary.p95
        );
        for (k, fraction) in &summary.fractions {
            let _ = write!(out, " frac_ge{}={:.3}", k, fraction);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\nby hour of day ({}):", selector);
    for bin in &result.by_hour {
        let _ = writeln!(
            out,
            "  {}  sessions={:<6} {}",
            bin.key,
            bin.session_count,
            fmt_opt(bin.value(selector))
        );
    }
    let _ = writeln!(
        out,
        "varies by hour: {} (std across hours {})",
        fmt_judgment(result.hour_variation.varies_by_hour),
        fmt_opt(result.hour_variation.std_across_hours)
    );

    let series = &report.window_series;
    let _ = writeln!(
        out,
        "\ntrace windows: {} kept, {} dropped as sparse",
        result.by_window.len(),
        result.sparse_windows_dropped
    );
    let _ = writeln!(
        out,
        "  mean={} std={} p10={} p90={} cv={}",
        fmt_opt(series.mean),
        fmt_opt(series.std),
        fmt_opt(series.p10),
        fmt_opt(series.p90),
        fmt_opt(series.cv)
    );

    for variance in &report.variance {
        render_variance(&mut out, variance);
    }

    out.truncate(out.trim_end().len());
    out
}

fn render_variance(out: &mut String, variance: &VarianceStats) {
    let _ = writeln!(
        out,
        "\nday x hour variance ({}): {} days, {} qualifying",
        variance.metric, variance.day_count, variance.qualifying_days
    );
    let _ = writeln!(
        out,
        "  intraday cv={} (std {})  interday cv={}  global cv={}",
        fmt_opt(variance.mean_intraday_cv),
        fmt_opt(variance.std_intraday_cv),
        fmt_opt(variance.mean_interday_cv),
        fmt_opt(variance.global_cv)
    );
    let _ = writeln!(
        out,
        "  daily correlation={} (std {}, {} pairs)",
        fmt_opt(variance.pairwise_daily_correlation_mean),
        fmt_opt(variance.pairwise_daily_correlation_std),
        variance.correlated_pairs
    );
    let _ = writeln!(
        out,
        "  diurnal shape stable: {}",
        fmt_judgment(variance.shape_stability.is_stable())
    );
}

fn fmt_scalar(scalar: SweepScalar, value: Option<f64>) -> String {
    match (scalar, value) {
        (SweepScalar::SessionCount, Some(v)) => format!("{:.0}", v),
        _ => fmt_opt(value),
    }
}

fn render_run(out: &mut String, index: usize, run: &SweepRun, report: &SweepReport) {
    let _ = write!(out, "{}", run.parameters.label());
    match run.error() {
        Some(error) => {
            let _ = write!(out, " failed: {}", error);
        }
        None => {
            for spread in &report.spreads {
                let value = spread.values.get(index).copied().flatten();
                let _ = write!(out, " {}={}", spread.scalar, fmt_scalar(spread.scalar, value));
            }
        }
    }
    out.push('\n');
}

pub fn render_sweep(report: &SweepReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "runs: {} ({} succeeded, {} failed)",
        report.runs.len(),
        report.succeeded().count(),
        report.failed().count()
    );
    for (index, run) in report.runs.iter().enumerate() {
        render_run(&mut out, index, run, report);
    }

    let _ = writeln!(out, "\nspread across runs:");
    for spread in &report.spreads {
        let _ = writeln!(
            out,
            "  {:<16}std={} range={}",
            spread.scalar.to_string(),
            fmt_opt(spread.std),
            fmt_opt(spread.range)
        );
    }

    let _ = write!(
        out,
        "\nrobust: {} (tolerance {:.3})",
        fmt_judgment(report.robust),
        report.tolerance
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnscope_runtime::{SensitivityRunner, analyze};
    use turnscope_testing::fixtures::scenario_a;
    use turnscope_types::{AnalysisConfig, ParameterSet};

    #[test]
    fn test_render_sweep() {
        let records = scenario_a();
        let config = AnalysisConfig::default();
        let report = SensitivityRunner::new(&records, &config).unwrap().run(&[
            ParameterSet::new(900.0, 3_600, 1),
            ParameterSet::new(1_800.0, 3_600, 1),
        ]);

        insta::assert_snapshot!(render_sweep(&report), @r"
        runs: 2 (2 succeeded, 0 failed)
        gap=900s width=3600s min=1 session_count=3 mean_turn_count=1.667 frac_ge2=0.667 frac_ge3=0.000 hourly_std=0.707
        gap=1800s width=3600s min=1 session_count=2 mean_turn_count=2.500 frac_ge2=0.500 frac_ge3=0.500 hourly_std=2.121

        spread across runs:
          session_count   std=0.707 range=1.000
          mean_turn_count std=0.589 range=0.833
          frac_ge2        std=0.118 range=0.167
          frac_ge3        std=0.354 range=0.500
          hourly_std      std=1.000 range=1.414

        robust: no (tolerance 0.010)
        ");
    }

    #[test]
    fn test_render_sweep_failed_run() {
        let records = scenario_a();
        let config = AnalysisConfig::default();
        let report = SensitivityRunner::new(&records, &config)
            .unwrap()
            .run(&[ParameterSet::new(0.0, 3_600, 1)]);

        let text = render_sweep(&report);
        assert!(text.contains("runs: 1 (0 succeeded, 1 failed)"));
        assert!(text.contains("gap=0s width=3600s min=1 failed: Configuration error"));
        assert!(text.ends_with("robust: undetermined (tolerance 0.010)"));
    }

    #[test]
    fn test_render_analysis_sections() {
        let report = analyze(
            &scenario_a(),
            &ParameterSet::new(900.0, 3_600, 0),
            &AnalysisConfig::default(),
        )
        .unwrap();
        let text = render_analysis(&report, MetricSelector::mean_turns());

        assert!(text.starts_with("parameters: gap=900s width=3600s min=0\n"));
        assert!(text.contains("records: 5  sessions: 3"));
        assert!(text.contains("turn_count: mean=1.667 median=2.000"));
        assert!(text.contains("frac_ge2=0.667 frac_ge3=0.000"));
        assert!(text.contains("  00h  sessions=2"));
        assert!(text.contains("varies by hour: yes (std across hours 0.707)"));
        assert!(text.contains(
            "\nday x hour variance (turn_count.mean): 1 days, 0 qualifying\n"
        ));
        assert!(text.contains("\nday x hour variance (duration.mean): 1 days"));
        assert!(text.ends_with("  diurnal shape stable: undetermined"));
    }
}
