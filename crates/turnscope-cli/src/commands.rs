use super::args::{Cli, Commands};
use super::handlers;
use crate::logging;
use anyhow::{Context, Result};
use std::path::PathBuf;
use turnscope_runtime::Config;

const DEFAULT_CONFIG_FILE: &str = "turnscope.toml";

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    match cli.command {
        Commands::Analyze {
            input,
            gap,
            bin_width,
            min_support,
        } => handlers::analyze::handle(
            &config,
            &input.input,
            handlers::analyze::Overrides {
                gap,
                bin_width,
                min_support,
            },
            cli.format,
        ),

        Commands::Sweep {
            input,
            gaps,
            bin_widths,
            min_supports,
        } => handlers::sweep::handle(
            &config,
            &input.input,
            handlers::sweep::Overrides {
                gaps,
                bin_widths,
                min_supports,
            },
            cli.format,
        ),
    }
}
