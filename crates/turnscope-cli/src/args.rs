use crate::types::{LogLevel, OutputFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "turnscope")]
#[command(about = "Infer sessions from a request trace and measure how session depth varies over time", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: ./turnscope.toml if present)")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    #[arg(long, global = true, help = "Log level; falls back to RUST_LOG, then warn")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the pipeline once and decompose day x hour variance")]
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, help = "Idle-gap threshold in seconds")]
        gap: Option<f64>,

        #[arg(long, help = "Trace window width in seconds")]
        bin_width: Option<u64>,

        #[arg(long, help = "Minimum sessions a trace window needs to be kept")]
        min_support: Option<usize>,
    },

    #[command(about = "Re-run the pipeline across a parameter grid and compare the results")]
    Sweep {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_delimiter = ',', help = "Gap thresholds in seconds, e.g. 900,1800,3600")]
        gaps: Option<Vec<f64>>,

        #[arg(long, value_delimiter = ',', help = "Trace window widths in seconds")]
        bin_widths: Option<Vec<u64>>,

        #[arg(long, value_delimiter = ',', help = "Minimum window support values")]
        min_supports: Option<Vec<usize>>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    #[arg(long, help = "CSV trace with a timestamp column and optional kind, session_id")]
    pub input: PathBuf,
}
