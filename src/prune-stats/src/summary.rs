//! Aggregated counters of a directory walk.

use serde::Serialize;

/// Counters gathered while walking a tree.
///
/// Sizes are only collected for regular files. Everything else is counted by
/// type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Regular files with a link count of 1.
    pub unlinked_files: u64,
    pub unlinked_bytes: u64,
    /// Regular files with more than one link.
    pub linked_files: u64,
    pub linked_bytes: u64,
    pub subdirectories: u64,
    pub append_only: u64,
    pub exclusive: u64,
    pub temporary: u64,
    pub symlinks: u64,
    pub devices: u64,
    pub named_pipes: u64,
    pub sockets: u64,
    pub permission_errors_files: u64,
    pub permission_errors_dirs: u64,
    pub other_errors_files: u64,
    pub other_errors_dirs: u64,
}

impl Summary {
    /// Add every counter of `other` to `self`.
    pub fn merge(&mut self, other: &Summary) {
        self.unlinked_files += other.unlinked_files;
        self.unlinked_bytes += other.unlinked_bytes;
        self.linked_files += other.linked_files;
        self.linked_bytes += other.linked_bytes;
        self.subdirectories += other.subdirectories;
        self.append_only += other.append_only;
        self.exclusive += other.exclusive;
        self.temporary += other.temporary;
        self.symlinks += other.symlinks;
        self.devices += other.devices;
        self.named_pipes += other.named_pipes;
        self.sockets += other.sockets;
        self.permission_errors_files += other.permission_errors_files;
        self.permission_errors_dirs += other.permission_errors_dirs;
        self.other_errors_files += other.other_errors_files;
        self.other_errors_dirs += other.other_errors_dirs;
    }

    /// Record a regular file by its link count and size.
    pub fn add_file(&mut self, links: u64, size: u64) {
        if links <= 1 {
            self.unlinked_files += 1;
            self.unlinked_bytes += size;
        } else {
            self.linked_files += 1;
            self.linked_bytes += size;
        }
    }

    pub fn total_errors(&self) -> u64 {
        self.permission_errors_files
            + self.permission_errors_dirs
            + self.other_errors_files
            + self.other_errors_dirs
    }
}
