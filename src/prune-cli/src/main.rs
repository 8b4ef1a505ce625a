//! prune_backups - main entry point.
//!
//! - `cli/` - Command-line argument parsing and dispatch
//! - `config` - Optional TOML settings
//! - `output` - Human and JSON rendering of a run

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use prune_cli::cli::{Cli, Commands, dispatch_command};
use prune_cli::config::PruneConfig;
use prune_cli::logging::{LOG_LEVEL_ENV, init_logging, resolve_log_level};
use prune_cli::styled_output::{colors_enabled, print_error, set_color_mode};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    set_color_mode(cli.color);

    // `version` must work even with a broken config file
    let config = match &cli.command {
        Commands::From(_) => PruneConfig::discover(cli.config.as_deref())?,
        Commands::Version => PruneConfig::default(),
    };

    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let level = resolve_log_level(
        cli.trace,
        cli.log_level,
        env_level.as_deref(),
        config.log_level.as_deref(),
    );
    init_logging(level, colors_enabled());

    dispatch_command(cli, config).await
}
