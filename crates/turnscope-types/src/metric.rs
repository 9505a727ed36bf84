use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::Session;

/// Per-session scalar that bins and summaries aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Number of records in the session; the reuse-potential proxy
    TurnCount,
    /// Session duration in seconds
    Duration,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::TurnCount, Metric::Duration];

    pub fn value(&self, session: &Session) -> f64 {
        match self {
            Metric::TurnCount => session.turn_count as f64,
            Metric::Duration => session.duration,
        }
    }

    /// Whether fraction-at-least-k aggregates are computed for this metric
    pub fn has_fractions(&self) -> bool {
        matches!(self, Metric::TurnCount)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::TurnCount => "turn_count",
            Metric::Duration => "duration",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which scalar of a [`MetricSummary`] to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Mean,
    Median,
    P90,
    P95,
    FractionAtLeast(u32),
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Mean => f.write_str("mean"),
            Statistic::Median => f.write_str("median"),
            Statistic::P90 => f.write_str("p90"),
            Statistic::P95 => f.write_str("p95"),
            Statistic::FractionAtLeast(k) => write!(f, "frac_ge{}", k),
        }
    }
}

/// A metric paired with the statistic read from its summary,
/// e.g. "mean turn count" or "fraction of sessions with >= 2 turns".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricSelector {
    pub metric: Metric,
    pub statistic: Statistic,
}

impl MetricSelector {
    pub fn new(metric: Metric, statistic: Statistic) -> Self {
        Self { metric, statistic }
    }

    pub fn mean_turns() -> Self {
        Self::new(Metric::TurnCount, Statistic::Mean)
    }
}

impl Default for MetricSelector {
    fn default() -> Self {
        Self::mean_turns()
    }
}

impl fmt::Display for MetricSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.metric, self.statistic)
    }
}

/// Distribution summary of one metric over a set of sessions.
///
/// Only ever built from a non-empty set; an empty set has no summary at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p90: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
    /// k -> fraction of sessions with value >= k (turn count only)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fractions: BTreeMap<u32, f64>,
}

impl MetricSummary {
    pub fn fraction_at_least(&self, k: u32) -> Option<f64> {
        self.fractions.get(&k).copied()
    }

    pub fn statistic(&self, statistic: Statistic) -> Option<f64> {
        match statistic {
            Statistic::Mean => Some(self.mean),
            Statistic::Median => Some(self.median),
            Statistic::P90 => Some(self.p90),
            Statistic::P95 => Some(self.p95),
            Statistic::FractionAtLeast(k) => self.fraction_at_least(k),
        }
    }
}

/// Aggregate statistics over a set of sessions (a whole dataset or one bin).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAggregate {
    pub session_count: usize,
    /// Empty when `session_count == 0`
    pub metrics: BTreeMap<Metric, MetricSummary>,
}

impl SessionAggregate {
    pub fn is_empty(&self) -> bool {
        self.session_count == 0
    }

    pub fn summary(&self, metric: Metric) -> Option<&MetricSummary> {
        self.metrics.get(&metric)
    }

    pub fn value(&self, selector: MetricSelector) -> Option<f64> {
        self.summary(selector.metric)
            .and_then(|summary| summary.statistic(selector.statistic))
    }

    pub fn mean_turns(&self) -> Option<f64> {
        self.value(MetricSelector::mean_turns())
    }

    pub fn fraction_at_least(&self, k: u32) -> Option<f64> {
        self.summary(Metric::TurnCount)
            .and_then(|summary| summary.fraction_at_least(k))
    }
}
