use crate::loader::load_trace;
use crate::output::emit_sweep;
use crate::types::OutputFormat;
use anyhow::{Result, bail};
use std::path::Path;
use tracing::warn;
use turnscope_runtime::{Config, SensitivityRunner};

/// Command-line axes that replace the config file's `[sweep]` axes
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub gaps: Option<Vec<f64>>,
    pub bin_widths: Option<Vec<u64>>,
    pub min_supports: Option<Vec<usize>>,
}

pub fn handle(
    config: &Config,
    input: &Path,
    overrides: Overrides,
    format: OutputFormat,
) -> Result<()> {
    let mut grid = config.sweep.clone();
    if let Some(gaps) = overrides.gaps {
        grid.gap_thresholds = gaps;
    }
    if let Some(widths) = overrides.bin_widths {
        grid.bin_widths = widths;
    }
    if let Some(supports) = overrides.min_supports {
        grid.min_supports = supports;
    }

    let parameter_sets = grid.expand();
    if parameter_sets.is_empty() {
        bail!("sweep grid is empty; every axis needs at least one value");
    }

    let trace = load_trace(input)?;
    if trace.skipped > 0 {
        warn!(skipped = trace.skipped, "some trace rows were skipped");
    }

    let runner = SensitivityRunner::new(&trace.records, &config.analysis)?;
    let report = runner.run(&parameter_sets);
    emit_sweep(&report, format)
}
