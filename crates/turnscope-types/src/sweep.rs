use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{BinTable, DiurnalVariation, HourOfDay, ParameterSet, SessionAggregate, WindowStart};

/// Output of one Segmenter -> Aggregator -> Binner run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub parameters: ParameterSet,
    pub record_count: usize,
    pub summary: SessionAggregate,
    pub by_hour: BinTable<HourOfDay>,
    /// Trace windows retained by the sparse-bin filter
    pub by_window: BinTable<WindowStart>,
    pub sparse_windows_dropped: usize,
    pub hour_variation: DiurnalVariation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded { result: Box<SensitivityResult> },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRun {
    pub parameters: ParameterSet,
    pub outcome: RunOutcome,
}

impl SweepRun {
    pub fn result(&self) -> Option<&SensitivityResult> {
        match &self.outcome {
            RunOutcome::Succeeded { result } => Some(result),
            RunOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            RunOutcome::Succeeded { .. } => None,
            RunOutcome::Failed { error } => Some(error),
        }
    }
}

/// Dataset-level scalar compared across sweep runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepScalar {
    SessionCount,
    MeanTurnCount,
    FractionAtLeast(u32),
    /// Std of the tracked statistic across hour-of-day bins within one run
    HourlyStd,
}

impl fmt::Display for SweepScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepScalar::SessionCount => f.write_str("session_count"),
            SweepScalar::MeanTurnCount => f.write_str("mean_turn_count"),
            SweepScalar::FractionAtLeast(k) => write!(f, "frac_ge{}", k),
            SweepScalar::HourlyStd => f.write_str("hourly_std"),
        }
    }
}

/// Spread of one scalar across the succeeded runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarSpread {
    pub scalar: SweepScalar,
    /// One entry per run, `None` for failed runs or undefined values
    pub values: Vec<Option<f64>>,
    pub std: Option<f64>,
    /// max - min
    pub range: Option<f64>,
}

/// Spread of the tracked statistic of one hour bin across runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourSpread {
    pub hour: HourOfDay,
    pub runs_observed: usize,
    pub std: Option<f64>,
}

/// Result of a sensitivity sweep, one run per parameter set in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub runs: Vec<SweepRun>,
    pub spreads: Vec<ScalarSpread>,
    pub hourly_spread: Vec<HourSpread>,
    pub tolerance: f64,
    /// `None` when fewer than two runs succeeded
    pub robust: Option<bool>,
}

impl SweepReport {
    pub fn get(&self, parameters: &ParameterSet) -> Option<&SweepRun> {
        self.runs.iter().find(|run| &run.parameters == parameters)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &SensitivityResult> {
        self.runs.iter().filter_map(SweepRun::result)
    }

    pub fn failed(&self) -> impl Iterator<Item = &SweepRun> {
        self.runs.iter().filter(|run| run.error().is_some())
    }

    pub fn spread(&self, scalar: SweepScalar) -> Option<&ScalarSpread> {
        self.spreads.iter().find(|s| s.scalar == scalar)
    }
}
