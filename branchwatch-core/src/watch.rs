//! Tree watches with an edge-triggered "modified" flag.
//!
//! A watch records that *something* under its root changed. Callers poll
//! [`TreeWatch::was_modified_since_last_call`], which clears the flag.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::error::{Result, VcsError};

/// Predicate `(directory, entry name) -> bool` for events to drop.
pub type IgnoreFn = Arc<dyn Fn(&Path, &str) -> bool + Send + Sync>;

pub trait TreeWatch: Send {
    /// True once per batch of changes since the previous call.
    fn was_modified_since_last_call(&self) -> bool;
}

/// Creates watches for newly discovered repositories.
pub trait WatchFactory: Send + Sync {
    fn watch(&self, root: &Path, ignore: Option<IgnoreFn>) -> Result<Box<dyn TreeWatch>>;
}

/// Recursive watch backed by the platform notifier.
pub struct NotifyTreeWatch {
    _watcher: RecommendedWatcher,
    modified: Arc<AtomicBool>,
}

impl NotifyTreeWatch {
    pub fn new(root: &Path, ignore: Option<IgnoreFn>) -> Result<Self> {
        let modified = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&modified);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if is_relevant(&event, ignore.as_ref()) {
                        flag.store(true, Ordering::SeqCst);
                    }
                }
                Err(e) => {
                    // Lost events can't be told apart from real changes
                    warn!("watch error: {}", e);
                    flag.store(true, Ordering::SeqCst);
                }
            }
        })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|source| VcsError::WatchPath {
                path: root.to_path_buf(),
                source,
            })?;
        debug!(root = %root.display(), "watching tree");

        Ok(Self {
            _watcher: watcher,
            modified,
        })
    }
}

impl TreeWatch for NotifyTreeWatch {
    fn was_modified_since_last_call(&self) -> bool {
        self.modified.swap(false, Ordering::SeqCst)
    }
}

/// Reports a change on every call.
///
/// Used when a real watch cannot be created (e.g. inotify limits), so the
/// cache degrades to recomputing on every query instead of going stale.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysStale;

impl TreeWatch for AlwaysStale {
    fn was_modified_since_last_call(&self) -> bool {
        true
    }
}

/// Default factory: [`NotifyTreeWatch`] per repository.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyWatchFactory;

impl WatchFactory for NotifyWatchFactory {
    fn watch(&self, root: &Path, ignore: Option<IgnoreFn>) -> Result<Box<dyn TreeWatch>> {
        let watch = NotifyTreeWatch::new(root, ignore)?;
        Ok(Box::new(watch))
    }
}

fn is_relevant(event: &Event, ignore: Option<&IgnoreFn>) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    let Some(ignore) = ignore else {
        return true;
    };
    if event.paths.is_empty() {
        return true;
    }
    event.paths.iter().any(|path| !is_ignored(path, ignore))
}

fn is_ignored(path: &Path, ignore: &IgnoreFn) -> bool {
    match (path.parent(), path.file_name().and_then(|n| n.to_str())) {
        (Some(dir), Some(name)) => ignore(dir, name),
        _ => false,
    }
}
