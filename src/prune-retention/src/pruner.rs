//! Directory pruner: lists a backup root, classifies its children and moves
//! the discarded ones into the archive sub-directory.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::classify::{Classification, classify, sort_descending};
use crate::compiler::compile_filters;
use crate::filter::Filter;
use crate::{PruneError, Result};

/// Default name of the archive sub-directory.
pub const DEFAULT_ARCHIVE_DIR: &str = "to_delete";

/// Options for a prune run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneOptions {
    /// Archive location, relative to the pruned root.
    #[serde(default = "default_archive_dir")]
    pub archive_dir_name: String,

    /// Compute and report the plan without touching the filesystem.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_archive_dir() -> String {
    DEFAULT_ARCHIVE_DIR.to_string()
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            archive_dir_name: default_archive_dir(),
            dry_run: false,
        }
    }
}

/// What a run is going to do, before anything is moved.
#[derive(Debug, Clone, Serialize)]
pub struct PrunePlan {
    pub root: PathBuf,
    pub archive_dir: PathBuf,
    /// Number of child directories found in `root`.
    pub directories_found: usize,
    pub filters: Vec<Filter>,
    pub classification: Classification,
}

/// Outcome of moving one discarded entry.
#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub name: String,
    pub from: PathBuf,
    pub to: PathBuf,
    /// Set when the move failed.
    pub error: Option<String>,
}

impl MoveOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of a prune run.
#[derive(Debug, Clone, Serialize)]
pub struct PruneReport {
    pub root: PathBuf,
    pub archive_dir: PathBuf,
    pub dry_run: bool,
    pub directories_found: usize,
    pub filter_count: usize,
    pub classification: Classification,
    pub outcomes: Vec<MoveOutcome>,
    /// Entries successfully relocated.
    pub moved: usize,
    /// Entries whose move failed.
    pub failed: usize,
}

/// Grandfather-father-son pruner for one backup root.
pub struct Pruner {
    options: PruneOptions,
}

impl Pruner {
    pub fn new(options: PruneOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PruneOptions {
        &self.options
    }

    /// Full path of the archive directory under `root`.
    pub fn archive_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.options.archive_dir_name)
    }

    /// Names of the immediate child directories of `root`, newest first.
    pub fn list_directories(root: &Path) -> Result<Vec<String>> {
        let read_err = |source| PruneError::ReadRoot {
            path: root.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(root).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if !entry.file_type().map_err(read_err)?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(name = ?raw, "Skipping directory with non UTF-8 name"),
            }
        }

        sort_descending(&mut names);
        Ok(names)
    }

    /// List `root` and decide what to keep and what to move.
    pub fn plan(&self, root: &Path, now: NaiveDateTime) -> Result<PrunePlan> {
        check_archive_name(&self.options.archive_dir_name)?;
        let names = Self::list_directories(root)?;
        let archive_dir = self.archive_dir(root);
        let protected = protected_name(root, &archive_dir);

        let (candidates, shielded): (Vec<String>, Vec<String>) = names
            .iter()
            .cloned()
            .partition(|name| protected.as_deref() != Some(name.as_str()));

        let filters = compile_filters(now, &candidates);
        let mut classification = classify(&candidates, &filters);
        classification.ignored.extend(shielded);

        debug!(
            root = %root.display(),
            directories = names.len(),
            filters = filters.len(),
            keep = classification.keep.len(),
            discard = classification.discard.len(),
            "Computed prune plan"
        );

        Ok(PrunePlan {
            root: root.to_path_buf(),
            archive_dir,
            directories_found: names.len(),
            filters,
            classification,
        })
    }

    /// Create the archive directory and move every discarded entry into it.
    ///
    /// Failing to create the archive directory aborts the run before any
    /// move; the error carries the entries that were scheduled. A failed move
    /// is recorded and the remaining entries are still processed.
    pub fn execute(&self, plan: PrunePlan) -> Result<PruneReport> {
        let mut report = PruneReport {
            root: plan.root,
            archive_dir: plan.archive_dir,
            dry_run: self.options.dry_run,
            directories_found: plan.directories_found,
            filter_count: plan.filters.len(),
            classification: plan.classification,
            outcomes: Vec::new(),
            moved: 0,
            failed: 0,
        };

        if self.options.dry_run {
            info!(
                scheduled = report.classification.discard.len(),
                "Dry run, nothing moved"
            );
            return Ok(report);
        }

        if let Err(source) = fs::create_dir_all(&report.archive_dir) {
            return Err(PruneError::CreateArchive {
                path: report.archive_dir,
                source,
                scheduled: report.classification.discard,
            });
        }

        for name in &report.classification.discard {
            let from = report.root.join(name);
            let to = report.archive_dir.join(name);
            let error = match fs::rename(&from, &to) {
                Ok(()) => {
                    debug!(from = %from.display(), to = %to.display(), "Moved directory");
                    report.moved += 1;
                    None
                }
                Err(e) => {
                    warn!(from = %from.display(), to = %to.display(), error = %e, "Failed to move directory");
                    report.failed += 1;
                    Some(e.to_string())
                }
            };
            report.outcomes.push(MoveOutcome {
                name: name.clone(),
                from,
                to,
                error,
            });
        }

        info!(
            moved = report.moved,
            failed = report.failed,
            archive = %report.archive_dir.display(),
            "Prune completed"
        );
        Ok(report)
    }

    /// Plan and execute in one go.
    pub fn prune_directory(&self, root: &Path, now: NaiveDateTime) -> Result<PruneReport> {
        let plan = self.plan(root, now)?;
        self.execute(plan)
    }
}

/// The archive name must stay below the root: no absolute paths and no `..`.
fn check_archive_name(name: &str) -> Result<()> {
    let components: Vec<Component<'_>> = Path::new(name).components().collect();
    let escapes = components.iter().any(|c| {
        matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });
    let has_name = components.iter().any(|c| matches!(c, Component::Normal(_)));
    if escapes || !has_name {
        return Err(PruneError::InvalidArchiveName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Name of the direct child of `root` that holds the archive, if any.
fn protected_name(root: &Path, archive_dir: &Path) -> Option<String> {
    archive_dir
        .strip_prefix(root)
        .ok()?
        .components()
        .find_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .map(str::to_string)
}
