use crate::loader::load_trace;
use crate::output::emit_analysis;
use crate::types::OutputFormat;
use anyhow::Result;
use std::path::Path;
use tracing::warn;
use turnscope_runtime::{Config, analyze};

/// Command-line values that replace the config file's `[parameters]`
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub gap: Option<f64>,
    pub bin_width: Option<u64>,
    pub min_support: Option<usize>,
}

pub fn handle(
    config: &Config,
    input: &Path,
    overrides: Overrides,
    format: OutputFormat,
) -> Result<()> {
    let mut parameters = config.parameters;
    if let Some(gap) = overrides.gap {
        parameters.gap_threshold = gap;
    }
    if let Some(width) = overrides.bin_width {
        parameters.bin_width = width;
    }
    if let Some(support) = overrides.min_support {
        parameters.min_support = support;
    }

    let trace = load_trace(input)?;
    if trace.skipped > 0 {
        warn!(skipped = trace.skipped, "some trace rows were skipped");
    }

    let report = analyze(&trace.records, &parameters, &config.analysis)?;
    emit_analysis(&report, config.analysis.selector, format)
}
