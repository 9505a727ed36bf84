//! Deterministic synthetic data.
//!
//! Everything random here is driven by a caller-provided seed so a failing
//! test reproduces exactly.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use turnscope_types::{
    DayHour, HOURS_PER_DAY, HourOfDay, Record, RecordKind, SECONDS_PER_DAY, SECONDS_PER_HOUR,
};

/// Seconds between consecutive records of one synthetic session
pub const TURN_SPACING: f64 = 10.0;

/// Grouped records at the given timestamps, no explicit ids
pub fn grouped_trace(timestamps: &[f64]) -> Vec<Record> {
    timestamps.iter().map(|&t| Record::grouped(t)).collect()
}

/// Five grouped records that split into three sessions at gap 900
pub fn scenario_a() -> Vec<Record> {
    grouped_trace(&[0.0, 500.0, 1_900.0, 2_000.0, 5_000.0])
}

/// One session per hour of every day, starting on the hour.
///
/// The session of hour `h` has `depth(h)` records spaced by [`TURN_SPACING`],
/// so the idle time between two sessions is just under one hour.
pub fn diurnal_trace(days: u32, depth: impl Fn(u8) -> u32) -> Vec<Record> {
    let mut records = Vec::new();
    for day in 0..i64::from(days) {
        for hour in HourOfDay::all() {
            let start = (day * SECONDS_PER_DAY + i64::from(hour.get()) * SECONDS_PER_HOUR) as f64;
            for turn in 0..depth(hour.get()).max(1) {
                records.push(Record::grouped(start + f64::from(turn) * TURN_SPACING));
            }
        }
    }
    records
}

/// Uniformly random timestamps in `[0, span)` with a mix of record kinds.
pub fn random_trace(seed: u64, len: usize, span: f64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let timestamp = rng.gen_range(0.0..span);
            if rng.gen_bool(0.2) {
                Record::singleton(timestamp)
            } else {
                Record::grouped(timestamp)
            }
        })
        .collect()
}

/// The same 24-hour pattern repeated on `days` consecutive days
pub fn identical_day_cells(days: i64, pattern: &[f64; HOURS_PER_DAY]) -> Vec<(DayHour, f64)> {
    (0..days)
        .flat_map(|day| {
            HourOfDay::all().map(move |hour| (DayHour::new(day, hour), pattern[hour.index()]))
        })
        .collect()
}

/// Independent uniform values in `[1, 5)` for every (day, hour) cell
pub fn random_day_cells(seed: u64, days: i64) -> Vec<(DayHour, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cells = Vec::with_capacity(days as usize * HOURS_PER_DAY);
    for day in 0..days {
        for hour in HourOfDay::all() {
            cells.push((DayHour::new(day, hour), rng.gen_range(1.0..5.0)));
        }
    }
    cells
}

/// A smooth daily curve peaking mid-afternoon
pub fn afternoon_peak() -> [f64; HOURS_PER_DAY] {
    let mut pattern = [0.0; HOURS_PER_DAY];
    for (hour, value) in pattern.iter_mut().enumerate() {
        let phase = (hour as f64 - 15.0) / 24.0 * std::f64::consts::TAU;
        *value = 3.0 + phase.cos();
    }
    pattern
}

/// Write records as a `timestamp,kind,session_id` CSV
pub fn write_trace_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["timestamp", "kind", "session_id"])?;
    for record in records {
        let kind = match record.kind {
            RecordKind::Grouped => "grouped",
            RecordKind::Singleton => "singleton",
        };
        let session = record.session_id.as_ref().map(|k| k.as_str()).unwrap_or("");
        writer.write_record([record.timestamp.to_string().as_str(), kind, session])?;
    }
    writer.flush()?;
    Ok(())
}
