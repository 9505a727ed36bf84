use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping domain of a record.
///
/// `Grouped` records are clustered into sessions by the idle-gap rule;
/// `Singleton` records always form a one-record session of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Grouped,
    Singleton,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Grouped => "grouped",
            RecordKind::Singleton => "singleton",
        }
    }
}

/// Explicit (ground-truth) session identifier attached by the record source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single timestamped request from the trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Seconds since an arbitrary epoch. Duplicates are allowed.
    pub timestamp: f64,
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionKey>,
}

impl Record {
    pub fn grouped(timestamp: f64) -> Self {
        Self {
            timestamp,
            kind: RecordKind::Grouped,
            session_id: None,
        }
    }

    pub fn singleton(timestamp: f64) -> Self {
        Self {
            timestamp,
            kind: RecordKind::Singleton,
            session_id: None,
        }
    }

    pub fn with_session(mut self, key: impl Into<String>) -> Self {
        self.session_id = Some(SessionKey::new(key));
        self
    }
}
