use crate::Result;
use rayon::prelude::*;
use tracing::{info, warn};
use turnscope_engine::stats::{range, sample_std};
use turnscope_types::{
    AnalysisConfig, HourOfDay, HourSpread, ParameterSet, Record, RunOutcome, ScalarSpread,
    SensitivityResult, SweepReport, SweepRun, SweepScalar,
};

use super::analyze::run_pipeline;

/// Re-runs the pipeline over a list of parameter sets.
///
/// Runs are independent and execute on the rayon pool; the report keeps
/// them in input order. A failing parameter set becomes a `Failed` run and
/// does not stop the others.
pub struct SensitivityRunner<'a> {
    records: &'a [Record],
    config: &'a AnalysisConfig,
}

impl<'a> SensitivityRunner<'a> {
    /// Fails when the shared analysis configuration is invalid
    pub fn new(records: &'a [Record], config: &'a AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { records, config })
    }

    pub fn run(&self, parameter_sets: &[ParameterSet]) -> SweepReport {
        info!(
            runs = parameter_sets.len(),
            records = self.records.len(),
            "starting sensitivity sweep"
        );

        let runs: Vec<SweepRun> = parameter_sets
            .par_iter()
            .map(|parameters| self.run_one(parameters))
            .collect();

        let report = summarize(runs, self.config);
        info!(
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            robust = ?report.robust,
            "sensitivity sweep complete"
        );
        report
    }

    fn run_one(&self, parameters: &ParameterSet) -> SweepRun {
        let outcome = match run_pipeline(self.records, parameters, self.config) {
            Ok(result) => {
                info!(
                    parameters = %parameters.label(),
                    sessions = result.summary.session_count,
                    "run succeeded"
                );
                RunOutcome::Succeeded {
                    result: Box::new(result),
                }
            }
            Err(err) => {
                warn!(parameters = %parameters.label(), error = %err, "run failed");
                RunOutcome::Failed {
                    error: err.to_string(),
                }
            }
        };
        SweepRun {
            parameters: *parameters,
            outcome,
        }
    }
}

fn scalar_value(result: &SensitivityResult, scalar: SweepScalar) -> Option<f64> {
    match scalar {
        SweepScalar::SessionCount => Some(result.summary.session_count as f64),
        SweepScalar::MeanTurnCount => result.summary.mean_turns(),
        SweepScalar::FractionAtLeast(k) => result.summary.fraction_at_least(k),
        SweepScalar::HourlyStd => result.hour_variation.std_across_hours,
    }
}

fn scalar_spread(runs: &[SweepRun], scalar: SweepScalar) -> ScalarSpread {
    let values: Vec<Option<f64>> = runs
        .iter()
        .map(|run| run.result().and_then(|result| scalar_value(result, scalar)))
        .collect();
    let defined: Vec<f64> = values.iter().flatten().copied().collect();

    ScalarSpread {
        scalar,
        values,
        std: sample_std(&defined),
        range: if defined.len() >= 2 {
            range(&defined)
        } else {
            None
        },
    }
}

fn hourly_spread(runs: &[SweepRun], config: &AnalysisConfig) -> Vec<HourSpread> {
    HourOfDay::all()
        .map(|hour| {
            let values: Vec<f64> = runs
                .iter()
                .filter_map(SweepRun::result)
                .filter_map(|result| {
                    result
                        .by_hour
                        .iter()
                        .find(|bin| bin.key == hour)
                        .and_then(|bin| bin.value(config.selector))
                })
                .collect();
            HourSpread {
                hour,
                runs_observed: values.len(),
                std: sample_std(&values),
            }
        })
        .collect()
}

/// Assemble spreads and the robustness judgment from finished runs
fn summarize(runs: Vec<SweepRun>, config: &AnalysisConfig) -> SweepReport {
    let thresholds = config.sorted_thresholds();

    let mut scalars = vec![SweepScalar::SessionCount, SweepScalar::MeanTurnCount];
    scalars.extend(thresholds.iter().map(|&k| SweepScalar::FractionAtLeast(k)));
    scalars.push(SweepScalar::HourlyStd);

    let spreads: Vec<ScalarSpread> = scalars
        .into_iter()
        .map(|scalar| scalar_spread(&runs, scalar))
        .collect();

    let succeeded = runs.iter().filter(|run| run.result().is_some()).count();
    let robust = match thresholds.first() {
        Some(&k) if succeeded >= 2 => spreads
            .iter()
            .find(|s| s.scalar == SweepScalar::FractionAtLeast(k))
            .and_then(|s| s.range)
            .map(|r| r <= config.robustness_tolerance),
        _ => None,
    };

    SweepReport {
        hourly_spread: hourly_spread(&runs, config),
        runs,
        spreads,
        tolerance: config.robustness_tolerance,
        robust,
    }
}
