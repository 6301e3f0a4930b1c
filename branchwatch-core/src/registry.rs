//! Entry point: maps queried paths to watched repositories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::data::VcsData;
use crate::locator::{Locator, RepositoryRoot};
use crate::runner::ProcessRunner;
use crate::settings::Settings;
use crate::watch::{AlwaysStale, IgnoreFn, NotifyWatchFactory, TreeWatch, WatchFactory};
use crate::watched::WatchedRepository;

/// Cache of watched repositories keyed by the canonical queried path.
///
/// Keys are the paths callers ask about, not repository roots, so two
/// directories of one repository get separate entries and watches. Entries
/// are never evicted. Paths outside any repository are not remembered and
/// get located again on every query.
pub struct RepositoryRegistry {
    locator: Arc<Locator>,
    watches: Arc<dyn WatchFactory>,
    entries: Mutex<HashMap<PathBuf, Arc<Mutex<WatchedRepository>>>>,
}

impl RepositoryRegistry {
    pub fn new(locator: Arc<Locator>, watches: Arc<dyn WatchFactory>) -> Self {
        Self {
            locator,
            watches,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Registry with real processes and filesystem watches.
    pub fn from_settings(settings: &Settings) -> Self {
        let locator = settings.locator(Arc::new(ProcessRunner));
        Self::new(Arc::new(locator), Arc::new(NotifyWatchFactory))
    }

    /// Branch and status for `path`, optionally narrowed to `subpath`
    /// (relative to the repository root).
    pub fn query(&self, path: impl AsRef<Path>, subpath: Option<&str>) -> VcsData {
        let path = canonicalize(path.as_ref());
        let Some(entry) = self.entry(&path) else {
            return VcsData::none();
        };
        let mut repo = lock(&entry);
        repo.data(subpath)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, path: &Path) -> Option<Arc<Mutex<WatchedRepository>>> {
        if let Some(entry) = lock(&self.entries).get(path) {
            return Some(Arc::clone(entry));
        }

        // Locate and watch without holding the map lock
        let root = self.locator.locate(path)?;
        debug!(path = %path.display(), root = %root.path.display(), "new repository entry");
        let watcher = self.watch(&root);
        let repo = WatchedRepository::new(root, Arc::clone(&self.locator), watcher);

        let mut entries = lock(&self.entries);
        let entry = entries
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(repo)));
        Some(Arc::clone(entry))
    }

    fn watch(&self, root: &RepositoryRoot) -> Box<dyn TreeWatch> {
        let ignore = self.locator.backend(root.kind).map(|backend| {
            let filter: IgnoreFn = Arc::new(move |dir: &Path, name: &str| {
                backend.ignores_event(dir, name)
            });
            filter
        });

        match self.watches.watch(&root.path, ignore) {
            Ok(watch) => watch,
            Err(e) => {
                warn!("{}; refreshing {} on every query", e, root.path.display());
                Box::new(AlwaysStale)
            }
        }
    }
}

/// Resolve symlinks when the path exists, otherwise just make it absolute.
fn canonicalize(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
