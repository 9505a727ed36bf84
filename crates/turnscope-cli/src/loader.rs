//! CSV trace loading.
//!
//! Header `timestamp[,kind][,session_id]`. A missing `kind` column or an
//! empty cell means `grouped`; an empty `session_id` means no explicit id.
//! Rows that cannot be placed on the time axis are skipped and counted.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};
use turnscope_types::{Record, RecordKind, SessionKey};

#[derive(Debug, Deserialize)]
struct TraceRow {
    timestamp: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTrace {
    pub records: Vec<Record>,
    /// Data rows that were dropped as malformed
    pub skipped: usize,
}

pub fn load_trace(path: &Path) -> Result<LoadedTrace> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open trace {}", path.display()))?;
    let trace = read_trace(file)?;
    info!(
        path = %path.display(),
        records = trace.records.len(),
        skipped = trace.skipped,
        "loaded trace"
    );
    Ok(trace)
}

pub fn read_trace<R: Read>(reader: R) -> Result<LoadedTrace> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("failed to read CSV header")?;
    if !headers.iter().any(|h| h == "timestamp") {
        bail!("trace has no 'timestamp' column");
    }

    let mut records = Vec::new();
    let mut skipped = 0;
    for (index, row) in reader.deserialize::<TraceRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        match row.map_err(|e| e.to_string()).and_then(parse_row) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(line, %reason, "skipping malformed row");
                skipped += 1;
            }
        }
    }

    Ok(LoadedTrace { records, skipped })
}

fn parse_row(row: TraceRow) -> std::result::Result<Record, String> {
    let timestamp: f64 = row
        .timestamp
        .parse()
        .map_err(|_| format!("unparsable timestamp '{}'", row.timestamp))?;
    if !timestamp.is_finite() || timestamp < 0.0 {
        return Err(format!("timestamp out of range: {}", row.timestamp));
    }

    let kind = match row.kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("grouped") => RecordKind::Grouped,
        Some("singleton") => RecordKind::Singleton,
        Some(other) => return Err(format!("unknown record kind '{}'", other)),
    };

    Ok(Record {
        timestamp,
        kind,
        session_id: row
            .session_id
            .filter(|id| !id.is_empty())
            .map(SessionKey::new),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_only_trace_is_grouped() {
        let trace = read_trace("timestamp\n0\n500.5\n".as_bytes()).unwrap();
        assert_eq!(trace.skipped, 0);
        assert_eq!(trace.records, vec![Record::grouped(0.0), Record::grouped(500.5)]);
    }

    #[test]
    fn test_kind_and_session_columns() {
        let csv = "timestamp,kind,session_id\n1,singleton,\n2,Grouped,conv-1\n3,,\n";
        let trace = read_trace(csv.as_bytes()).unwrap();

        assert_eq!(
            trace.records,
            vec![
                Record::singleton(1.0),
                Record::grouped(2.0).with_session("conv-1"),
                Record::grouped(3.0),
            ]
        );
    }

    #[test]
    fn test_malformed_rows_are_skipped_and_counted() {
        let csv = "timestamp,kind\nabc,grouped\n-5,grouped\nNaN,grouped\n10,burst\n20,singleton\n";
        let trace = read_trace(csv.as_bytes()).unwrap();

        assert_eq!(trace.skipped, 4);
        assert_eq!(trace.records, vec![Record::singleton(20.0)]);
    }

    #[test]
    fn test_missing_timestamp_column_is_an_error() {
        let err = read_trace("time,kind\n1,grouped\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }
}
