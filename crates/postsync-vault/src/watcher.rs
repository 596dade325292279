//! File system watcher for re-linking when the index changes.
//!
//! Uses the `notify` crate for cross-platform file system events
//! (FSEvents on macOS, inotify on Linux, ReadDirectoryChanges on Windows).
//! Only the index file is observed, so documents rewritten by a relink
//! pass do not trigger another one.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use postsync_core::error::SyncError;

/// Events emitted by the index watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEvent {
    /// The index file was created or modified.
    Changed(PathBuf),
    /// The index file was deleted.
    Removed(PathBuf),
}

/// Watches one index file and emits events when it changes.
pub struct IndexWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::Receiver<IndexEvent>,
}

impl IndexWatcher {
    /// Start watching `index_path`. Its parent directory must exist.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the watcher cannot be created.
    pub fn start(index_path: &Path) -> Result<Self, SyncError> {
        let (tx, rx) = mpsc::channel();

        let dir = index_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let file_name = index_path.file_name().map(ToOwned::to_owned);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            let Ok(event) = res else {
                return;
            };
            for path in &event.paths {
                if path.file_name() != file_name.as_deref() {
                    continue;
                }

                let index_event = match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) => {
                        IndexEvent::Changed(path.clone())
                    }
                    EventKind::Remove(_) => IndexEvent::Removed(path.clone()),
                    _ => continue,
                };
                let _ = tx.send(index_event);
            }
        })
        .map_err(|e| SyncError::Io(std::io::Error::other(e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| SyncError::Io(std::io::Error::other(e)))?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<IndexEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Drain events that arrive within `quiet` of each other and return
    /// whether any were seen. Editors often save in several steps.
    pub fn settle(&self, quiet: Duration) -> bool {
        let mut seen = false;
        while self.receiver.recv_timeout(quiet).is_ok() {
            seen = true;
        }
        seen
    }
}
