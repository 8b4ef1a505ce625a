//! Command dispatch and execution handlers.

use anyhow::{Result, bail};
use chrono::Local;
use prune_retention::{PruneError, PruneOptions, PruneReport, Pruner};
use prune_stats::{STATS_SUPPORTED, Summary, render_summary, summarize};
use tracing::info;

use super::args::{Cli, Commands, FromArgs, get_long_version};
use crate::config::PruneConfig;
use crate::output::{render_create_archive_error, render_human, render_json};
use crate::styled_output::{print_info, print_warning};

/// Dispatch a CLI command to its handler.
pub async fn dispatch_command(cli: Cli, config: PruneConfig) -> Result<()> {
    match cli.command {
        Commands::From(args) => run_prune(args, &config).await,
        Commands::Version => {
            println!("{}", version_line());
            Ok(())
        }
    }
}

/// `prune_backups <arch> <os> <version (hash date)>`
pub fn version_line() -> String {
    format!(
        "prune_backups {} {} {}",
        std::env::consts::ARCH,
        std::env::consts::OS,
        get_long_version()
    )
}

/// Effective settings of one `from` run, flags over config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub archive_dir: String,
    pub verbosity: u8,
    pub dry_run: bool,
    pub stats: bool,
    pub json: bool,
}

impl RunSettings {
    pub fn resolve(args: &FromArgs, config: &PruneConfig) -> Self {
        Self {
            archive_dir: args
                .to
                .clone()
                .unwrap_or_else(|| config.archive_dir.clone()),
            verbosity: args.verbosity.unwrap_or(config.verbosity),
            dry_run: args.dry_run,
            stats: args.stats,
            json: args.json,
        }
    }
}

async fn run_prune(args: FromArgs, config: &PruneConfig) -> Result<()> {
    let settings = RunSettings::resolve(&args, config);

    if settings.stats && !STATS_SUPPORTED {
        bail!("stats flag not supported for your OS");
    }

    let pruner = Pruner::new(PruneOptions {
        archive_dir_name: settings.archive_dir.clone(),
        dry_run: settings.dry_run,
    });
    let now = Local::now().naive_local();
    info!(root = %args.dir.display(), now = %now, dry_run = settings.dry_run, "Pruning");

    let report = match pruner.prune_directory(&args.dir, now) {
        Ok(report) => report,
        Err(PruneError::CreateArchive {
            path,
            source,
            scheduled,
        }) => bail!(render_create_archive_error(
            &path,
            &source,
            &scheduled,
            settings.verbosity
        )),
        Err(e) => return Err(e.into()),
    };

    let stats = if settings.stats {
        collect_stats(&report, config).await
    } else {
        None
    };

    if settings.json {
        println!("{}", render_json(&report, stats.as_ref())?);
        return Ok(());
    }

    print!("{}", render_human(&report, settings.verbosity));
    if report.failed > 0 && settings.verbosity == 0 {
        print_warning(&format!("{} directories could not be moved", report.failed));
    }
    if let Some(summary) = &stats {
        print!("{}", render_summary(&report.archive_dir, summary));
    }
    Ok(())
}

/// Errors are reported on stderr, never returned.
async fn collect_stats(report: &PruneReport, config: &PruneConfig) -> Option<Summary> {
    if report.dry_run && !report.archive_dir.exists() {
        print_info(&format!(
            "{} does not exist yet, no stats to show",
            report.archive_dir.display()
        ));
        return None;
    }
    match summarize(&report.archive_dir, &config.stats).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            print_warning(&format!(
                "Failed to collect stats for {}: {e}",
                report.archive_dir.display()
            ));
            None
        }
    }
}
