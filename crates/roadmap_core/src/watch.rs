//! Per-file change notification.
//!
//! A [`FileWatcher`] watches one file and forwards change and removal events
//! to a channel. The watcher never touches a cache itself; the owner drains
//! the channel and decides what to invalidate.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// What happened to a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    /// Contents or metadata changed, or the file was recreated.
    Changed,
    /// File was deleted or renamed away.
    Removed,
}

/// Change notification for one watched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Path as registered with the watcher.
    pub path: PathBuf,
    /// What happened.
    pub kind: WatchEventKind,
}

impl WatchEvent {
    /// Map a notify event kind onto ours. Access events are ignored.
    fn classify(kind: &EventKind) -> Option<WatchEventKind> {
        match kind {
            EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEventKind::Changed),
            EventKind::Remove(_) => Some(WatchEventKind::Removed),
            _ => None,
        }
    }
}

/// Watches a single file until dropped or stopped.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    path: PathBuf,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher").field("path", &self.path).finish()
    }
}

impl FileWatcher {
    /// Start watching `path`, sending events to `events`.
    ///
    /// Events carry `path` exactly as given so the receiver can use it as a
    /// lookup key.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created or the
    /// path cannot be watched.
    pub fn start(path: &Path, events: Sender<WatchEvent>) -> notify::Result<Self> {
        let key = path.to_path_buf();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            if let Some(kind) = WatchEvent::classify(&event.kind) {
                // receiver gone means the owner was dropped
                let _ = events.send(WatchEvent {
                    path: key.clone(),
                    kind,
                });
            }
        })?;

        watcher.watch(path, RecursiveMode::NonRecursive)?;

        Ok(Self {
            watcher,
            path: path.to_path_buf(),
        })
    }

    /// Path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop watching. Errors from the platform are ignored.
    pub fn stop(mut self) {
        let _ = self.watcher.unwatch(&self.path);
    }
}
