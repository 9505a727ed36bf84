pub mod config;
pub mod error;
pub mod ops;

pub use config::Config;
pub use error::{Error, Result};
pub use ops::{AnalysisReport, SensitivityRunner, analyze, run_pipeline};
