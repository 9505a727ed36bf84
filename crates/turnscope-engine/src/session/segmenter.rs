use std::collections::BTreeMap;

use tracing::debug;
use turnscope_types::{
    Error, Record, RecordKind, Result, Segmentation, Session, SessionId, SessionKey,
    SessionOrigin,
};

/// Clusters records into sessions.
///
/// Records carrying an explicit session id are grouped by id equality.
/// Singleton records without an id become one-record sessions. Grouped
/// records without an id are scanned in time order and split wherever the
/// idle gap to the previous grouped record exceeds `gap_threshold`.
#[derive(Debug, Clone, Copy)]
pub struct SessionSegmenter {
    gap_threshold: f64,
}

impl SessionSegmenter {
    pub fn new(gap_threshold: f64) -> Result<Self> {
        if !(gap_threshold.is_finite() && gap_threshold > 0.0) {
            return Err(Error::configuration(format!(
                "gap_threshold must be a positive number of seconds, got {}",
                gap_threshold
            )));
        }
        Ok(Self { gap_threshold })
    }

    pub fn segment(&self, records: &[Record]) -> Result<Segmentation> {
        if let Some(index) = records.iter().position(|r| !r.timestamp.is_finite()) {
            return Err(Error::InvalidRecord {
                index,
                reason: format!("non-finite timestamp {}", records[index].timestamp),
            });
        }

        let mut builder = SegmentBuilder::new(records.len(), self.gap_threshold);
        for index in time_order(records) {
            builder.push(index, &records[index]);
        }
        let segmentation = builder.finish();

        debug!(
            records = records.len(),
            sessions = segmentation.sessions.len(),
            gap_threshold = self.gap_threshold,
            "segmented records into sessions"
        );
        Ok(segmentation)
    }
}

/// Input indices sorted by timestamp; the sort is stable so ties keep input order
fn time_order(records: &[Record]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| records[a].timestamp.total_cmp(&records[b].timestamp));
    order
}

struct Draft {
    origin: SessionOrigin,
    key: Option<SessionKey>,
    start: f64,
    end: f64,
    turns: u32,
}

/// Accumulates sessions while records arrive in time order.
///
/// Drafts are opened in start-time order, so the finished session list needs
/// no further sorting.
struct SegmentBuilder<'a> {
    gap_threshold: f64,
    drafts: Vec<Draft>,
    assignment: Vec<usize>,
    explicit: BTreeMap<&'a SessionKey, usize>,
    /// Draft index and last timestamp of the open gap-inferred session
    open_grouped: Option<(usize, f64)>,
}

impl<'a> SegmentBuilder<'a> {
    fn new(record_count: usize, gap_threshold: f64) -> Self {
        Self {
            gap_threshold,
            drafts: Vec::new(),
            assignment: vec![0; record_count],
            explicit: BTreeMap::new(),
            open_grouped: None,
        }
    }

    fn push(&mut self, index: usize, record: &'a Record) {
        let timestamp = record.timestamp;

        let draft = match (&record.session_id, record.kind) {
            (Some(key), _) => match self.explicit.get(key).copied() {
                Some(draft) => {
                    self.extend(draft, timestamp);
                    draft
                }
                None => {
                    let draft = self.open(SessionOrigin::Explicit, Some(key.clone()), timestamp);
                    self.explicit.insert(key, draft);
                    draft
                }
            },
            (None, RecordKind::Singleton) => self.open(SessionOrigin::Singleton, None, timestamp),
            (None, RecordKind::Grouped) => {
                let draft = match self.open_grouped {
                    Some((draft, last)) if timestamp - last <= self.gap_threshold => {
                        self.extend(draft, timestamp);
                        draft
                    }
                    _ => self.open(SessionOrigin::GapInferred, None, timestamp),
                };
                self.open_grouped = Some((draft, timestamp));
                draft
            }
        };

        self.assignment[index] = draft;
    }

    fn open(&mut self, origin: SessionOrigin, key: Option<SessionKey>, timestamp: f64) -> usize {
        self.drafts.push(Draft {
            origin,
            key,
            start: timestamp,
            end: timestamp,
            turns: 1,
        });
        self.drafts.len() - 1
    }

    fn extend(&mut self, draft: usize, timestamp: f64) {
        let draft = &mut self.drafts[draft];
        draft.end = draft.end.max(timestamp);
        draft.turns += 1;
    }

    fn finish(self) -> Segmentation {
        let mut next_inferred = 0u64;
        let sessions = self
            .drafts
            .into_iter()
            .map(|draft| {
                let id = match draft.key {
                    Some(key) => SessionId::Explicit(key),
                    None => {
                        let id = SessionId::Inferred(next_inferred);
                        next_inferred += 1;
                        id
                    }
                };
                Session::new(id, draft.origin, draft.start, draft.end, draft.turns)
            })
            .collect();

        Segmentation {
            sessions,
            assignment: self.assignment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped(timestamps: &[f64]) -> Vec<Record> {
        timestamps.iter().map(|&t| Record::grouped(t)).collect()
    }

    fn shape(segmentation: &Segmentation) -> Vec<(u32, f64, f64)> {
        segmentation
            .sessions
            .iter()
            .map(|s| (s.turn_count, s.start_time, s.end_time))
            .collect()
    }

    #[test]
    fn test_gap_rule_splits_on_idle_time() {
        let records = grouped(&[0.0, 500.0, 1_900.0, 2_000.0, 5_000.0]);
        let segmentation = SessionSegmenter::new(900.0).unwrap().segment(&records).unwrap();

        assert_eq!(
            shape(&segmentation),
            vec![(2, 0.0, 500.0), (2, 1_900.0, 2_000.0), (1, 5_000.0, 5_000.0)]
        );
        assert_eq!(segmentation.assignment, vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn test_gap_equal_to_threshold_extends_session() {
        let records = grouped(&[0.0, 900.0, 1_800.1]);
        let segmentation = SessionSegmenter::new(900.0).unwrap().segment(&records).unwrap();
        assert_eq!(shape(&segmentation), vec![(2, 0.0, 900.0), (1, 1_800.1, 1_800.1)]);
    }

    #[test]
    fn test_singletons_do_not_interrupt_grouped_sessions() {
        let records = vec![
            Record::grouped(0.0),
            Record::singleton(100.0),
            Record::grouped(200.0),
            Record::singleton(200.0),
        ];
        let segmentation = SessionSegmenter::new(900.0).unwrap().segment(&records).unwrap();

        assert_eq!(segmentation.session_count(), 3);
        assert_eq!(segmentation.assignment, vec![0, 1, 0, 2]);
        assert_eq!(segmentation.sessions[0].origin, SessionOrigin::GapInferred);
        assert_eq!(segmentation.sessions[0].turn_count, 2);
        assert_eq!(segmentation.sessions[1].origin, SessionOrigin::Singleton);
        assert_eq!(segmentation.sessions[2].origin, SessionOrigin::Singleton);
    }

    #[test]
    fn test_unsorted_input_is_sorted_before_segmenting() {
        let records = grouped(&[2_000.0, 0.0, 5_000.0, 500.0, 1_900.0]);
        let segmentation = SessionSegmenter::new(900.0).unwrap().segment(&records).unwrap();

        assert_eq!(
            shape(&segmentation),
            vec![(2, 0.0, 500.0), (2, 1_900.0, 2_000.0), (1, 5_000.0, 5_000.0)]
        );
        assert_eq!(segmentation.assignment, vec![1, 0, 2, 0, 1]);
    }

    #[test]
    fn test_duplicate_timestamps_are_allowed() {
        let records = vec![
            Record::singleton(10.0),
            Record::singleton(10.0),
            Record::grouped(10.0),
        ];
        let segmentation = SessionSegmenter::new(60.0).unwrap().segment(&records).unwrap();

        // ties keep input order, so ids follow record order
        assert_eq!(segmentation.assignment, vec![0, 1, 2]);
        assert_eq!(segmentation.sessions[2].id, SessionId::Inferred(2));
    }

    #[test]
    fn test_explicit_ids_bypass_gap_inference() {
        let records = vec![
            Record::grouped(0.0).with_session("a"),
            Record::grouped(10_000.0).with_session("a"),
            Record::grouped(5.0).with_session("b"),
            Record::singleton(20.0).with_session("b"),
        ];
        let segmentation = SessionSegmenter::new(900.0).unwrap().segment(&records).unwrap();

        assert_eq!(segmentation.session_count(), 2);
        let a = &segmentation.sessions[0];
        assert_eq!(a.id, SessionId::Explicit(SessionKey::new("a")));
        assert_eq!((a.turn_count, a.start_time, a.end_time), (2, 0.0, 10_000.0));
        let b = &segmentation.sessions[1];
        assert_eq!(b.origin, SessionOrigin::Explicit);
        assert_eq!((b.turn_count, b.duration), (2, 15.0));
    }

    #[test]
    fn test_records_without_id_fall_back_to_gap_rule() {
        let records = vec![
            Record::grouped(0.0).with_session("known"),
            Record::grouped(100.0),
            Record::grouped(200.0),
        ];
        let segmentation = SessionSegmenter::new(900.0).unwrap().segment(&records).unwrap();

        assert_eq!(segmentation.session_count(), 2);
        assert_eq!(segmentation.sessions[1].id, SessionId::Inferred(0));
        assert_eq!(segmentation.sessions[1].turn_count, 2);
    }

    #[test]
    fn test_empty_input_yields_no_sessions() {
        let segmentation = SessionSegmenter::new(900.0).unwrap().segment(&[]).unwrap();
        assert!(segmentation.is_empty());
        assert_eq!(segmentation.record_count(), 0);
    }

    #[test]
    fn test_invalid_gap_threshold_fails_fast() {
        assert!(matches!(SessionSegmenter::new(0.0), Err(Error::Configuration(_))));
        assert!(SessionSegmenter::new(-1.0).is_err());
        assert!(SessionSegmenter::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_non_finite_timestamp_is_rejected() {
        let records = vec![Record::grouped(1.0), Record::grouped(f64::NAN)];
        let err = SessionSegmenter::new(900.0).unwrap().segment(&records).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { index: 1, .. }));
    }
}
