//! CLI argument structures and parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::styles::{AFTER_HELP, get_styles};

/// Build-time version string with commit hash and build date.
pub fn get_long_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = match option_env!("PRUNE_BACKUPS_GIT_HASH") {
        Some(v) => v,
        None => "untagged",
    };
    const BUILD_DATE: &str = match option_env!("PRUNE_BACKUPS_BUILD_DATE") {
        Some(v) => v,
        None => "unknown",
    };

    static LONG_VERSION: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    LONG_VERSION.get_or_init(|| format!("{} ({} {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Log verbosity level for diagnostics on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Color output mode for CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// Automatically detect if output is a terminal
    #[default]
    Auto,
    /// Always output with colors
    Always,
    /// Never output with colors
    Never,
}

/// prune_backups - thin out timestamp-named backup directories
///
/// Keeps one directory per hour for a day, one per day for a month and one
/// per month for about ten years. The naming pattern is YYYY-MM-DD_HH-mm.
/// Within each time slot the latest directory is retained; the rest are moved
/// into a sub-directory for manual deletion.
#[derive(Parser, Debug)]
#[command(name = "prune_backups")]
#[command(author, version, long_version = get_long_version())]
#[command(styles = get_styles(), after_help = AFTER_HELP)]
pub struct Cli {
    /// Log level for diagnostics on stderr
    #[arg(long = "log-level", global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Enable trace-level logging for debugging
    #[arg(long = "trace", global = true)]
    pub trace: bool,

    /// Read settings from this config file
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Control color output: auto (default), always, or never
    #[arg(long = "color", global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prune subdirectories from <DIR> and move them to a 'to_delete'
    /// subdirectory (created automatically in <DIR>) or --to a given location
    #[command(display_order = 1)]
    From(FromArgs),

    /// Show version/build information and exit
    #[command(display_order = 2)]
    Version,
}

/// Arguments for the `from` command.
#[derive(Args, Debug, Clone)]
pub struct FromArgs {
    /// The directory that will be pruned. The user running prune_backups
    /// needs r/w access to it.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Name of the directory the pruned directories are moved to, relative
    /// to <DIR>. Absolute paths and `..` are rejected [default: to_delete]
    #[arg(short = 't', long = "to", value_name = "NAME")]
    pub to: Option<String>,

    /// Show total size of linked and unlinked files in the archive directory
    #[arg(short = 's', long = "stats")]
    pub stats: bool,

    /// 0 - mute, 1 - some, 2 - a lot [default: 1]
    #[arg(
        short = 'v',
        long = "verbosity",
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    pub verbosity: Option<u8>,

    /// Show what would be moved without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
