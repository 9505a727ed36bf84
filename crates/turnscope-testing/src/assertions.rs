//! Assertions shared by the integration tests.

use anyhow::{Context, Result};
use serde_json::Value;

/// Panics unless `actual` is within `tolerance` of `expected`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} +/- {}, got {}",
        expected,
        tolerance,
        actual
    );
}

/// Assert that sweep JSON output holds the expected number of runs.
pub fn assert_run_count(json: &Value, expected: usize) -> Result<()> {
    let runs = json["runs"]
        .as_array()
        .context("Expected 'runs' array in JSON")?;

    if runs.len() != expected {
        anyhow::bail!("Expected {} runs, got {}", expected, runs.len());
    }

    Ok(())
}

/// Assert that every sweep run has the given status (`succeeded` or `failed`).
pub fn assert_all_runs(json: &Value, status: &str) -> Result<()> {
    let runs = json["runs"]
        .as_array()
        .context("Expected 'runs' array in JSON")?;

    for (i, run) in runs.iter().enumerate() {
        let actual = run["outcome"]["status"]
            .as_str()
            .with_context(|| format!("Run {} missing outcome.status", i))?;
        if actual != status {
            anyhow::bail!("Run {} has status {} but expected {}", i, actual, status);
        }
    }

    Ok(())
}

/// Assert that analyze JSON output reports the expected session count.
pub fn assert_session_count(json: &Value, expected: u64) -> Result<()> {
    let count = json["result"]["summary"]["session_count"]
        .as_u64()
        .context("Expected 'result.summary.session_count' in JSON")?;

    if count != expected {
        anyhow::bail!("Expected {} sessions, got {}", expected, count);
    }

    Ok(())
}
