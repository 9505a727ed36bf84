//! Isolated environment for CLI integration tests.

use anyhow::Result;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use turnscope_types::Record;

use crate::fixtures::write_trace_csv;

/// Temp directory with a trace file and an optional config file.
///
/// # Example
/// ```no_run
/// use turnscope_testing::{TraceWorld, fixtures};
///
/// let world = TraceWorld::new().with_trace(&fixtures::scenario_a()).unwrap();
/// # let _ = world;
/// ```
pub struct TraceWorld {
    temp_dir: TempDir,
    trace_path: PathBuf,
    config_path: PathBuf,
    format: String,
}

impl Default for TraceWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let trace_path = temp_dir.path().join("trace.csv");
        let config_path = temp_dir.path().join("turnscope.toml");
        Self {
            temp_dir,
            trace_path,
            config_path,
            format: "json".to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn trace_path(&self) -> &Path {
        &self.trace_path
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn with_trace(self, records: &[Record]) -> Result<Self> {
        write_trace_csv(&self.trace_path, records)?;
        Ok(self)
    }

    /// Write raw CSV text, for malformed-input tests
    pub fn with_raw_trace(self, contents: &str) -> Result<Self> {
        std::fs::write(&self.trace_path, contents)?;
        Ok(self)
    }

    pub fn with_config(self, toml: &str) -> Result<Self> {
        std::fs::write(&self.config_path, toml)?;
        Ok(self)
    }

    /// Output format passed to the CLI (`json` unless changed)
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Point a CLI command at this world's config file and output format.
    ///
    /// The caller provides the base command (e.g. from `Command::cargo_bin("turnscope")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config")
            .arg(&self.config_path)
            .arg("--format")
            .arg(&self.format)
            .current_dir(self.root())
    }
}
