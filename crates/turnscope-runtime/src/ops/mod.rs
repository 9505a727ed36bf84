pub mod analyze;
pub mod sweep;

pub use analyze::{AnalysisReport, analyze, run_pipeline};
pub use sweep::SensitivityRunner;
