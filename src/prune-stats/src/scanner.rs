//! Concurrent directory walk.
//!
//! Every sub-directory is scanned by its own task. A semaphore bounds how many
//! directories are being read at once; a permit is held only while the
//! directory's own entries are read and tallied, never while waiting for
//! children, so the walk cannot starve itself. Each directory collects a local
//! [`Summary`] and merges it into the shared total exactly once.

use std::fs::{FileType, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use crate::config::StatsConfig;
use crate::retry::RetryPolicy;
use crate::summary::Summary;
use crate::{Result, STATS_SUPPORTED, StatsError};

/// Summarize the tree rooted at `path`.
///
/// Fails only if `path` itself cannot be inspected. Unreadable entries below
/// it are counted in the returned summary. A file path yields the summary of
/// that single file.
pub async fn summarize(path: &Path, config: &StatsConfig) -> Result<Summary> {
    if !STATS_SUPPORTED {
        return Err(StatsError::Unsupported);
    }

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| StatsError::Inspect {
            path: path.to_path_buf(),
            source,
        })?;

    let scanner = Arc::new(Scanner {
        total: Mutex::new(Summary::default()),
        permits: Semaphore::new(config.concurrency()),
        retry: config.retry_policy(),
    });

    if metadata.is_dir() {
        Arc::clone(&scanner).scan_dir(path.to_path_buf()).await;
    } else {
        let mut local = Summary::default();
        scanner.tally_file(path, &mut local).await;
        scanner.total.lock().await.merge(&local);
    }

    let total = *scanner.total.lock().await;
    debug!(
        path = %path.display(),
        files = total.unlinked_files + total.linked_files,
        directories = total.subdirectories,
        errors = total.total_errors(),
        "Summarized directory tree"
    );
    Ok(total)
}

struct Scanner {
    total: Mutex<Summary>,
    permits: Semaphore,
    retry: RetryPolicy,
}

impl Scanner {
    fn scan_dir(self: Arc<Self>, dir: PathBuf) -> BoxFuture<'static, ()> {
        async move {
            let mut local = Summary::default();
            let subdirs = self.scan_entries(&dir, &mut local).await;
            local.subdirectories += subdirs.len() as u64;
            self.total.lock().await.merge(&local);

            let mut tasks = JoinSet::new();
            for subdir in subdirs {
                tasks.spawn(Arc::clone(&self).scan_dir(subdir));
            }
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    warn!(error = %e, "Directory scan task failed");
                }
            }
        }
        .boxed()
    }

    /// Read and tally the entries of `dir` under a permit. Returns the
    /// sub-directories still to be scanned.
    async fn scan_entries(&self, dir: &Path, local: &mut Summary) -> Vec<PathBuf> {
        let Ok(_permit) = self.permits.acquire().await else {
            return Vec::new();
        };

        let entries = match self.retry.execute(|| read_entries(dir)).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Cannot read directory");
                count_dir_error(&e, local);
                return Vec::new();
            }
        };

        let mut subdirs = Vec::new();
        for (path, file_type) in entries {
            if file_type.is_file() {
                self.tally_file(&path, local).await;
            } else if file_type.is_dir() {
                subdirs.push(path);
            } else {
                count_special(&file_type, local);
            }
        }
        trace!(dir = %dir.display(), subdirs = subdirs.len(), "Scanned directory");
        subdirs
    }

    async fn tally_file(&self, path: &Path, local: &mut Summary) {
        match self.retry.execute(|| open_and_stat(path)).await {
            Ok(metadata) => local.add_file(link_count(&metadata), metadata.len()),
            Err(e) => {
                debug!(file = %path.display(), error = %e, "Cannot inspect file");
                count_file_error(&e, local);
            }
        }
    }
}

async fn read_entries(dir: &Path) -> io::Result<Vec<(PathBuf, FileType)>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let file_type = entry.file_type().await?;
        entries.push((entry.path(), file_type));
    }
    Ok(entries)
}

/// Open the file so unreadable files are reported, then stat the handle.
async fn open_and_stat(path: &Path) -> io::Result<Metadata> {
    let file = tokio::fs::File::open(path).await?;
    file.metadata().await
}

fn count_dir_error(error: &io::Error, summary: &mut Summary) {
    if error.kind() == io::ErrorKind::PermissionDenied {
        summary.permission_errors_dirs += 1;
    } else {
        summary.other_errors_dirs += 1;
    }
}

fn count_file_error(error: &io::Error, summary: &mut Summary) {
    if error.kind() == io::ErrorKind::PermissionDenied {
        summary.permission_errors_files += 1;
    } else {
        summary.other_errors_files += 1;
    }
}

#[cfg(unix)]
fn link_count(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
fn link_count(_metadata: &Metadata) -> u64 {
    1
}

#[cfg(unix)]
fn count_special(file_type: &FileType, summary: &mut Summary) {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_symlink() {
        summary.symlinks += 1;
    } else if file_type.is_block_device() || file_type.is_char_device() {
        summary.devices += 1;
    } else if file_type.is_fifo() {
        summary.named_pipes += 1;
    } else if file_type.is_socket() {
        summary.sockets += 1;
    }
}

#[cfg(not(unix))]
fn count_special(file_type: &FileType, summary: &mut Summary) {
    if file_type.is_symlink() {
        summary.symlinks += 1;
    }
}
