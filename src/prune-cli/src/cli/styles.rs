//! Help output styling.

use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Help theme: bold cyan headers, green literals, yellow placeholders.
pub fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Cyan.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

/// Retention scheme, environment and config file summary shown after `--help`.
pub const AFTER_HELP: &str = color_print::cstr!(
    r#"<cyan,bold>RETENTION</>
    Directory names must start with <green>YYYY-MM-DD_HH</>. Within each slot the newest
    directory is kept: one per hour for the last 24 hours, one per day for
    the 30 days before, one per month for the 119 months before that.
    Everything else that is date-named is moved, never deleted.

<cyan,bold>EXAMPLES</>
    <green,bold>prune_backups from</> <dim>/srv/backups</>                 Move pruned dirs to /srv/backups/to_delete
    <green,bold>prune_backups from</> <dim>/srv/backups -t old -s</>       Use ./old and print its size
    <green,bold>prune_backups from</> <dim>/srv/backups --dry-run -v 2</>  Show the plan only

<cyan,bold>ENVIRONMENT VARIABLES</>
    <yellow>PRUNE_BACKUPS_CONFIG</>      Config file (default: ~/.config/prune_backups/config.toml)
    <yellow>PRUNE_BACKUPS_LOG_LEVEL</>   Log verbosity (error, warn, info, debug, trace)
    <yellow>NO_COLOR</>                  Disable colored output (set to '1' or 'true')"#
);
