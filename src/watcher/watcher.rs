//! File system watcher using notify-rs.

use std::path::{Path, PathBuf};

use notify::event::CreateKind;
use notify::{Event, EventKind as NotifyKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::events::{EventKind, FileEvent};
use crate::error::WatcherError;
use crate::Result;

/// Buffer size for the event channel between the notify callback thread
/// and the async watch loop.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Non-recursive watcher over a single directory.
///
/// Holds the OS watch handle for its lifetime; dropping the watcher (or
/// calling [`DirWatcher::stop`]) releases it. Restart by constructing a
/// new watcher for the same directory.
pub struct DirWatcher {
    _watcher: RecommendedWatcher,
    event_rx: mpsc::Receiver<FileEvent>,
    root: PathBuf,
}

impl DirWatcher {
    /// Start watching a directory (non-recursive).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or the OS watch
    /// cannot be established.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.is_dir() {
            return Err(WatcherError::WatchFailed {
                path: root.display().to_string(),
                reason: "directory does not exist".to_string(),
            }
            .into());
        }

        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let callback_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    for file_event in map_event(event, &callback_root) {
                        // Receiver dropped means the loop is shutting down.
                        let _ = event_tx.blocking_send(file_event);
                    }
                }
                Err(e) => {
                    tracing::error!("Watch error: {:?}", e);
                }
            }
        })
        .map_err(|e| WatcherError::WatchFailed {
            path: root.display().to_string(),
            reason: e.to_string(),
        })?;

        watcher
            .watch(&root, RecursiveMode::NonRecursive)
            .map_err(|e| WatcherError::WatchFailed {
                path: root.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(path = %root.display(), "Watching directory");

        Ok(Self {
            _watcher: watcher,
            event_rx,
            root,
        })
    }

    /// Receive the next file event.
    ///
    /// Returns `None` once the watcher thread has shut down.
    pub async fn recv(&mut self) -> Option<FileEvent> {
        self.event_rx.recv().await
    }

    /// The watched directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stop watching and release the OS watch handle.
    pub fn stop(self) {
        tracing::info!(path = %self.root.display(), "Stopped watching directory");
        drop(self);
    }
}

/// Translate a raw notify event into pipeline events, one per path.
///
/// Events for the watched directory itself are dropped.
fn map_event(event: Event, root: &Path) -> Vec<FileEvent> {
    let kind = match event.kind {
        NotifyKind::Create(_) => EventKind::Created,
        _ => EventKind::Other,
    };
    let folder_creation = matches!(event.kind, NotifyKind::Create(CreateKind::Folder));

    event
        .paths
        .into_iter()
        .filter(|path| path != root)
        .map(|path| {
            let is_directory = folder_creation || path.is_dir();
            FileEvent::new(path, kind, is_directory)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_watcher_nonexistent_dir() {
        let result = DirWatcher::new("/nonexistent/directory");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_watcher_holds_root() {
        let tmp = TempDir::new().unwrap();
        let watcher = DirWatcher::new(tmp.path()).unwrap();
        assert_eq!(watcher.root(), tmp.path());
        watcher.stop();
    }

    #[test]
    fn test_map_event_creation() {
        let root = Path::new("/exports");
        let event = Event::new(NotifyKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/exports/report.txt"));

        let mapped = map_event(event, root);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].kind, EventKind::Created);
        assert!(!mapped[0].is_directory);
    }

    #[test]
    fn test_map_event_drops_root_path() {
        let root = Path::new("/exports");
        let event =
            Event::new(NotifyKind::Create(CreateKind::Folder)).add_path(PathBuf::from("/exports"));

        assert!(map_event(event, root).is_empty());
    }

    #[test]
    fn test_map_event_folder_creation_is_directory() {
        let root = Path::new("/exports");
        let event = Event::new(NotifyKind::Create(CreateKind::Folder))
            .add_path(PathBuf::from("/exports/archive"));

        let mapped = map_event(event, root);
        assert_eq!(mapped.len(), 1);
        assert!(mapped[0].is_directory);
    }

    #[test]
    fn test_map_event_other_kinds() {
        let root = Path::new("/exports");
        let event = Event::new(NotifyKind::Modify(notify::event::ModifyKind::Any))
            .add_path(PathBuf::from("/exports/report.txt"));

        let mapped = map_event(event, root);
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].kind, EventKind::Other);
    }
}
