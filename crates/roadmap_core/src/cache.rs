//! Caching repository for roadmap documents.
//!
//! Holds at most one parsed copy per path. A cached copy is served only while
//! the file's modification time still equals the one recorded when the copy
//! was made; capacity is bounded by LRU eviction. With file watching on, a
//! watcher per cached path invalidates entries on external change.

use crate::config::CacheSettings;
use crate::error::{Result, RoadmapError};
use crate::json_io;
use crate::types::Roadmap;
use crate::watch::{FileWatcher, WatchEvent, WatchEventKind};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Options for a [`RoadmapRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Keep parsed roadmaps in memory (default: true).
    pub cache_enabled: bool,
    /// Maximum number of cached paths (default: 10).
    pub max_cache_size: usize,
    /// Watch cached files for external changes (default: true).
    pub watch_files: bool,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_cache_size: 10,
            watch_files: true,
        }
    }
}

impl From<&CacheSettings> for RepositoryOptions {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            cache_enabled: settings.enabled,
            max_cache_size: settings.max_size,
            watch_files: settings.watch_files,
        }
    }
}

/// Counters describing cache behavior since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Loads served from memory.
    pub hits: u64,
    /// Loads that went to disk.
    pub misses: u64,
    /// Entries dropped to make room.
    pub evictions: u64,
    /// Files read and parsed.
    pub disk_reads: u64,
}

#[derive(Debug)]
struct CacheEntry {
    data: Arc<Roadmap>,
    modified: SystemTime,
}

/// Serves roadmap documents by path, caching parsed copies.
///
/// All state is private to one instance; two repositories never share
/// entries or watchers.
pub struct RoadmapRepository {
    options: RepositoryOptions,
    cache: LruCache<PathBuf, CacheEntry>,
    watchers: HashMap<PathBuf, FileWatcher>,
    events_tx: Sender<WatchEvent>,
    events_rx: Receiver<WatchEvent>,
    stats: CacheStats,
}

impl RoadmapRepository {
    /// Creates a repository.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidCacheSize`] if caching is enabled with a
    /// capacity of zero.
    pub fn new(options: RepositoryOptions) -> Result<Self> {
        let capacity = match NonZeroUsize::new(options.max_cache_size) {
            Some(capacity) => capacity,
            None if options.cache_enabled => return Err(RoadmapError::InvalidCacheSize),
            None => NonZeroUsize::MIN,
        };
        let (events_tx, events_rx) = mpsc::channel();

        Ok(Self {
            options,
            cache: LruCache::new(capacity),
            watchers: HashMap::new(),
            events_tx,
            events_rx,
            stats: CacheStats::default(),
        })
    }

    /// Options this repository was built with.
    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Load the roadmap at `path`.
    ///
    /// A cached copy is returned only if the file's modification time is
    /// unchanged; the returned `Arc` is then the same allocation as before.
    /// A failed stat counts as a change.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::NotFound`], [`RoadmapError::InvalidJson`],
    /// [`RoadmapError::InvalidDocument`] or [`RoadmapError::Io`] from the
    /// disk read.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Roadmap>> {
        self.process_watch_events();

        if !self.options.cache_enabled {
            self.stats.disk_reads += 1;
            return json_io::read_typed(path).map(Arc::new);
        }

        if let Some(entry) = self.cache.peek(path) {
            match json_io::modified_time(path) {
                Ok(modified) if modified == entry.modified => {
                    self.stats.hits += 1;
                    debug!(path = %path.display(), "roadmap cache hit");
                    // get() promotes to most recently used
                    if let Some(entry) = self.cache.get(path) {
                        return Ok(Arc::clone(&entry.data));
                    }
                }
                Ok(_) => debug!(path = %path.display(), "cached roadmap is stale"),
                Err(e) => debug!(path = %path.display(), error = %e, "stat failed, dropping cached roadmap"),
            }
            self.cache.pop(path);
        }

        self.stats.misses += 1;
        self.stats.disk_reads += 1;
        let (data, modified) = match json_io::read_stamped(path, json_io::read_typed::<Roadmap>) {
            Ok(read) => read,
            Err(e) => {
                self.stop_watcher(path);
                return Err(e);
            }
        };
        let data = Arc::new(data);

        self.insert(path, Arc::clone(&data), modified);
        Ok(data)
    }

    /// Write `roadmap` to `path`, replacing the file.
    ///
    /// With caching on, the entry for `path` is refreshed from the written
    /// data so the next [`load`](Self::load) is a hit.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::Serialization`] or [`RoadmapError::Io`].
    pub fn save(&mut self, path: &Path, roadmap: &Roadmap) -> Result<()> {
        self.process_watch_events();
        json_io::write_pretty(path, roadmap)?;
        debug!(path = %path.display(), tasks = roadmap.tasks.len(), "roadmap saved");

        if self.options.cache_enabled {
            let modified = json_io::modified_time(path)?;
            self.insert(path, Arc::new(roadmap.clone()), modified);
        }
        Ok(())
    }

    /// Drop the cached entry for `path` and stop its watcher. No-op if not
    /// cached. The next [`load`](Self::load) starts watching again.
    pub fn invalidate(&mut self, path: &Path) {
        if self.cache.pop(path).is_some() {
            debug!(path = %path.display(), "roadmap cache entry invalidated");
        }
        self.stop_watcher(path);
    }

    /// Drop every cached entry and stop every watcher.
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
        for (_, watcher) in self.watchers.drain() {
            watcher.stop();
        }
    }

    /// Returns true if `path` has a cached entry.
    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains(path)
    }

    /// Number of cached entries.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Number of running watchers.
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    /// Cache counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Stop every watcher and clear the cache. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        for (path, watcher) in self.watchers.drain() {
            debug!(path = %path.display(), "stopping watcher");
            watcher.stop();
        }
        self.cache.clear();
        while self.events_rx.try_recv().is_ok() {}
    }

    /// Apply every pending watch event. Returns how many were handled.
    ///
    /// Called at the start of [`load`](Self::load) and [`save`](Self::save).
    pub fn process_watch_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_watch_event(event);
            handled += 1;
        }
        handled
    }

    /// Apply one watch event.
    ///
    /// `Changed` invalidates the entry unless the file still has the
    /// recorded modification time (the event then describes a state the
    /// cache already holds, e.g. our own save). `Removed` always
    /// invalidates. Either way an invalidated path loses its watcher.
    pub fn handle_watch_event(&mut self, event: WatchEvent) {
        match event.kind {
            WatchEventKind::Changed => {
                let Some(recorded) = self.cache.peek(&event.path).map(|e| e.modified) else {
                    return;
                };
                if json_io::modified_time(&event.path).ok() == Some(recorded) {
                    return;
                }
                self.invalidate(&event.path);
            }
            WatchEventKind::Removed => {
                debug!(path = %event.path.display(), "watched roadmap removed");
                self.invalidate(&event.path);
            }
        }
    }

    fn insert(&mut self, path: &Path, data: Arc<Roadmap>, modified: SystemTime) {
        if !self.cache.contains(path) && self.cache.len() >= self.cache.cap().get() {
            if let Some((evicted, _)) = self.cache.pop_lru() {
                self.stats.evictions += 1;
                debug!(path = %evicted.display(), "evicting least recently used roadmap");
                self.stop_watcher(&evicted);
            }
        }
        self.cache.put(path.to_path_buf(), CacheEntry { data, modified });
        self.ensure_watcher(path);
    }

    fn stop_watcher(&mut self, path: &Path) {
        if let Some(watcher) = self.watchers.remove(path) {
            debug!(path = %path.display(), "stopping watcher");
            watcher.stop();
        }
    }

    fn ensure_watcher(&mut self, path: &Path) {
        if !self.options.watch_files || self.watchers.contains_key(path) {
            return;
        }
        match FileWatcher::start(path, self.events_tx.clone()) {
            Ok(watcher) => {
                debug!(path = %path.display(), "watching roadmap");
                self.watchers.insert(path.to_path_buf(), watcher);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "could not watch roadmap"),
        }
    }
}

impl std::fmt::Debug for RoadmapRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadmapRepository")
            .field("options", &self.options)
            .field("cached", &self.cache.len())
            .field("watchers", &self.watchers.len())
            .field("stats", &self.stats)
            .finish()
    }
}
