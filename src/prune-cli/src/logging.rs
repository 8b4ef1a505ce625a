//! Tracing setup.
//!
//! Diagnostics go to stderr through `tracing`. The progress lines controlled
//! by `--verbosity` are printed separately on stdout.

use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

/// Environment variable overriding the log level.
pub const LOG_LEVEL_ENV: &str = "PRUNE_BACKUPS_LOG_LEVEL";

/// Pick the effective level: `--trace`, then `--log-level`, then the
/// environment, then the config file, then `warn`. Unparsable values are
/// skipped.
pub fn resolve_log_level(
    trace: bool,
    flag: Option<LogLevel>,
    env_value: Option<&str>,
    config_value: Option<&str>,
) -> LogLevel {
    if trace {
        return LogLevel::Trace;
    }
    flag.or_else(|| env_value.and_then(LogLevel::from_str_loose))
        .or_else(|| config_value.and_then(LogLevel::from_str_loose))
        .unwrap_or_default()
}

/// Install the global fmt subscriber writing to stderr.
pub fn init_logging(level: LogLevel, ansi: bool) {
    let filter = EnvFilter::new(level.as_filter_str());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .try_init();
}
