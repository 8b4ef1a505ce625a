//! prune_backups command-line front end.
//!
//! - `cli/` - argument parsing, help styling and command dispatch
//! - `config` - optional TOML configuration file
//! - `logging` - tracing subscriber setup
//! - `output` - human and JSON rendering of a prune run
//! - `styled_output` - colored status messages on stderr

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
pub mod styled_output;
