use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use turnscope_types::{AnalysisConfig, ParameterGrid, ParameterSet};

/// Contents of a `turnscope.toml` file.
///
/// ```toml
/// [analysis]
/// fraction_thresholds = [2, 3]
///
/// [parameters]
/// gap_threshold = 1800.0
/// bin_width = 3600
/// min_support = 100
///
/// [sweep]
/// gap_thresholds = [900.0, 1800.0, 3600.0]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Parameters of a single `analyze` run
    #[serde(default)]
    pub parameters: ParameterSet,
    /// Grid expanded by `sweep`
    #[serde(default)]
    pub sweep: ParameterGrid,
}

impl Config {
    /// Load a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
