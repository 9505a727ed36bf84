use serde::{Deserialize, Serialize};

use crate::SessionKey;

/// Session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionId {
    /// Sequential id assigned in start-time order to sessions without ground truth
    Inferred(u64),
    /// Identifier carried by the records themselves
    Explicit(SessionKey),
}

/// How a session came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOrigin {
    /// Clustered from grouped records under the idle-gap rule
    GapInferred,
    /// A lone singleton record
    Singleton,
    /// Grouped by explicit session id equality
    Explicit,
}

/// A session: a maximal run of records attributed to one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub origin: SessionOrigin,
    pub start_time: f64,
    pub end_time: f64,
    /// Number of records in the session (always >= 1)
    pub turn_count: u32,
    /// `end_time - start_time`, clipped at zero
    pub duration: f64,
}

impl Session {
    pub fn new(
        id: SessionId,
        origin: SessionOrigin,
        start_time: f64,
        end_time: f64,
        turn_count: u32,
    ) -> Self {
        Self {
            id,
            origin,
            start_time,
            end_time,
            turn_count,
            duration: (end_time - start_time).max(0.0),
        }
    }
}

/// Output of the segmenter.
///
/// `assignment[i]` is the index into `sessions` of the session that input
/// record `i` belongs to, so every record maps to exactly one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    pub sessions: Vec<Session>,
    pub assignment: Vec<usize>,
}

impl Segmentation {
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn record_count(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_is_clipped_at_zero() {
        let session = Session::new(SessionId::Inferred(0), SessionOrigin::GapInferred, 10.0, 4.0, 2);
        assert_eq!(session.duration, 0.0);

        let session = Session::new(SessionId::Inferred(1), SessionOrigin::GapInferred, 10.0, 25.5, 3);
        assert_eq!(session.duration, 15.5);
    }

    #[test]
    fn test_session_id_serialization() {
        let inferred = serde_json::to_string(&SessionId::Inferred(7)).unwrap();
        assert_eq!(inferred, r#"{"inferred":7}"#);

        let explicit =
            serde_json::to_string(&SessionId::Explicit(SessionKey::new("conv-1"))).unwrap();
        assert_eq!(explicit, r#"{"explicit":"conv-1"}"#);
    }
}
