//! Pending-change tracking for a note's working tree.
//!
//! Two states: clean and dirty. Any edit makes the transaction dirty and it
//! stays dirty, even if later edits happen to restore the snapshot, until
//! the working state is promoted (commit) or restored (discard).

use super::node::{FileNode, Visibility};

/// Last committed (or as-loaded) files and visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub files: Vec<FileNode>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone)]
pub struct PendingChanges {
    dirty: bool,
    snapshot: Snapshot,
}

impl PendingChanges {
    /// Take an independent copy of the loaded state; starts clean.
    pub fn new(files: &[FileNode], visibility: Visibility) -> Self {
        Self {
            dirty: false,
            snapshot: Snapshot {
                files: files.to_vec(),
                visibility,
            },
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Make the given working state the new snapshot and clear the dirty flag.
    pub fn promote(&mut self, files: &[FileNode], visibility: Visibility) {
        self.snapshot = Snapshot {
            files: files.to_vec(),
            visibility,
        };
        self.dirty = false;
    }

    /// Hand back a fresh copy of the snapshot and clear the dirty flag.
    pub fn restore(&mut self) -> (Vec<FileNode>, Visibility) {
        self.dirty = false;
        (self.snapshot.files.clone(), self.snapshot.visibility)
    }
}
