use std::collections::{BTreeMap, BTreeSet};

use turnscope_types::{Metric, MetricSummary, Session, SessionAggregate};

use crate::stats::quantile_sorted;

/// Reduce a set of sessions to per-metric summaries.
///
/// Sums, counts and fraction counters are accumulated in a single pass; the
/// per-metric value vectors are sorted afterwards for exact quantiles. An
/// empty input yields an aggregate with no metric summaries.
pub fn aggregate_sessions<'a, I>(sessions: I, fraction_thresholds: &[u32]) -> SessionAggregate
where
    I: IntoIterator<Item = &'a Session>,
{
    let thresholds: BTreeSet<u32> = fraction_thresholds.iter().copied().collect();
    let mut accumulators: Vec<MetricAccumulator> = Metric::ALL
        .iter()
        .map(|&metric| MetricAccumulator::new(metric, &thresholds))
        .collect();

    let mut session_count = 0;
    for session in sessions {
        session_count += 1;
        for accumulator in &mut accumulators {
            accumulator.push(session);
        }
    }

    let metrics = accumulators
        .into_iter()
        .filter_map(|accumulator| {
            let metric = accumulator.metric;
            accumulator.finish().map(|summary| (metric, summary))
        })
        .collect();

    SessionAggregate {
        session_count,
        metrics,
    }
}

struct MetricAccumulator {
    metric: Metric,
    values: Vec<f64>,
    sum: f64,
    /// (k, sessions with value >= k)
    at_least: Vec<(u32, usize)>,
}

impl MetricAccumulator {
    fn new(metric: Metric, thresholds: &BTreeSet<u32>) -> Self {
        let at_least = if metric.has_fractions() {
            thresholds.iter().map(|&k| (k, 0)).collect()
        } else {
            Vec::new()
        };
        Self {
            metric,
            values: Vec::new(),
            sum: 0.0,
            at_least,
        }
    }

    fn push(&mut self, session: &Session) {
        let value = self.metric.value(session);
        self.values.push(value);
        self.sum += value;
        for (k, count) in &mut self.at_least {
            if value >= f64::from(*k) {
                *count += 1;
            }
        }
    }

    fn finish(mut self) -> Option<MetricSummary> {
        let count = self.values.len();
        if count == 0 {
            return None;
        }
        self.values.sort_by(f64::total_cmp);
        let values = &self.values;

        let fractions: BTreeMap<u32, f64> = self
            .at_least
            .iter()
            .map(|&(k, hits)| (k, hits as f64 / count as f64))
            .collect();

        Some(MetricSummary {
            count,
            mean: self.sum / count as f64,
            median: quantile_sorted(values, 0.50)?,
            p90: quantile_sorted(values, 0.90)?,
            p95: quantile_sorted(values, 0.95)?,
            min: values[0],
            max: values[count - 1],
            fractions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnscope_types::{SessionId, SessionOrigin};

    fn session(turns: u32, start: f64, end: f64) -> Session {
        Session::new(SessionId::Inferred(0), SessionOrigin::GapInferred, start, end, turns)
    }

    #[test]
    fn test_turn_count_summary() {
        let sessions = vec![
            session(1, 0.0, 0.0),
            session(2, 0.0, 30.0),
            session(3, 0.0, 60.0),
            session(10, 0.0, 600.0),
        ];
        let aggregate = aggregate_sessions(&sessions, &[2, 3]);

        assert_eq!(aggregate.session_count, 4);
        let turns = aggregate.summary(Metric::TurnCount).unwrap();
        assert_eq!(turns.count, 4);
        assert_eq!(turns.mean, 4.0);
        assert_eq!(turns.median, 2.5);
        assert_eq!(turns.min, 1.0);
        assert_eq!(turns.max, 10.0);
        assert_eq!(turns.fraction_at_least(2), Some(0.75));
        assert_eq!(turns.fraction_at_least(3), Some(0.5));
        assert!((turns.p90 - 7.9).abs() < 1e-9);
    }

    #[test]
    fn test_duration_summary_has_no_fractions() {
        let sessions = vec![session(2, 0.0, 30.0), session(3, 100.0, 160.0)];
        let aggregate = aggregate_sessions(&sessions, &[2, 3]);

        let duration = aggregate.summary(Metric::Duration).unwrap();
        assert_eq!(duration.mean, 45.0);
        assert!(duration.fractions.is_empty());
    }

    #[test]
    fn test_empty_input_reports_absent_metrics() {
        let aggregate = aggregate_sessions(std::iter::empty::<&Session>(), &[2, 3]);
        assert_eq!(aggregate.session_count, 0);
        assert!(aggregate.metrics.is_empty());
        assert_eq!(aggregate.mean_turns(), None);
    }

    #[test]
    fn test_duplicate_thresholds_are_merged() {
        let sessions = vec![session(2, 0.0, 1.0), session(1, 5.0, 5.0)];
        let aggregate = aggregate_sessions(&sessions, &[2, 2]);
        let turns = aggregate.summary(Metric::TurnCount).unwrap();
        assert_eq!(turns.fractions.len(), 1);
        assert_eq!(turns.fraction_at_least(2), Some(0.5));
    }
}
