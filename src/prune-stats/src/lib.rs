//! Disk-usage summary of a directory tree.
//!
//! Walks a tree concurrently and counts regular files (split into files with
//! a single link and hard-linked files), their sizes, sub-directories and
//! special files. Errors below the starting path are tallied, not returned.

pub mod config;
pub mod format;
pub mod retry;
pub mod scanner;
pub mod summary;

pub use config::StatsConfig;
pub use format::{format_si, nice_bytes, nice_number, render_summary};
pub use retry::{RetryPolicy, is_fd_exhausted};
pub use scanner::summarize;
pub use summary::Summary;

use std::path::PathBuf;
use thiserror::Error;

/// Link counts are only available on unix targets.
pub const STATS_SUPPORTED: bool = cfg!(unix);

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("stats flag not supported for your OS")]
    Unsupported,
    #[error("Cannot inspect {}: {source}", path.display())]
    Inspect {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StatsError>;
