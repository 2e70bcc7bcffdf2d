//! File system event types.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Kinds of file system occurrence the pipeline distinguishes.
///
/// Only creations drive deliveries; everything else collapses to `Other`
/// so the filter can reject it uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A new entry appeared in the watched directory.
    Created,
    /// Any other change (modify, remove, metadata).
    Other,
}

/// A single file system event, produced once per occurrence.
#[derive(Debug, Clone)]
pub struct FileEvent {
    /// Absolute path of the affected entry.
    pub path: PathBuf,
    /// What happened.
    pub kind: EventKind,
    /// Whether the entry is a directory.
    pub is_directory: bool,
    /// When the watcher observed the event.
    pub observed_at: DateTime<Local>,
}

impl FileEvent {
    /// Create an event observed now.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: EventKind, is_directory: bool) -> Self {
        Self {
            path: path.into(),
            kind,
            is_directory,
            observed_at: Local::now(),
        }
    }

    /// Convenience constructor for a regular-file creation event.
    #[must_use]
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(path, EventKind::Created, false)
    }

    /// File name component of the event path, if representable as UTF-8.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    /// The event path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
