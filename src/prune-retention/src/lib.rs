//! Grandfather-father-son retention for timestamp-named backup directories.
//!
//! Keeps one entry per hour for the last 24 hours, one per day for the 30
//! days before that and one per month for the 119 months before that. Every
//! other date-named entry is moved into an archive sub-directory instead of
//! being deleted.
//!
//! # Example
//!
//! ```rust,no_run
//! use prune_retention::{PruneOptions, Pruner};
//! use std::path::Path;
//!
//! let pruner = Pruner::new(PruneOptions::default());
//! let now = chrono::Local::now().naive_local();
//! let report = pruner
//!     .prune_directory(Path::new("/backups"), now)
//!     .expect("prune failed");
//! println!("Moved {} directories", report.moved);
//! ```

pub mod calendar;
pub mod classify;
pub mod compiler;
pub mod filter;
pub mod pruner;

pub use calendar::YearMonth;
pub use classify::{Classification, classify, is_date_shaped, sort_descending};
pub use compiler::{DailyFilters, compile_filters, daily_filters, hourly_filters, monthly_filters};
pub use filter::{Filter, Granularity};
pub use pruner::{
    DEFAULT_ARCHIVE_DIR, MoveOutcome, PruneOptions, PrunePlan, PruneReport, Pruner,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PruneError {
    #[error("Could not read directory {}: {source}", path.display())]
    ReadRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error creating directory {}: {source}", path.display())]
    CreateArchive {
        path: PathBuf,
        source: std::io::Error,
        /// Entries that would have been moved.
        scheduled: Vec<String>,
    },
    #[error("Invalid archive directory name {name:?}: it must be a relative path inside the pruned directory")]
    InvalidArchiveName { name: String },
}

pub type Result<T> = std::result::Result<T, PruneError>;
