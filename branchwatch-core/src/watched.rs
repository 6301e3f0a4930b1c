//! One repository root with its watch and cached branch/status.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::data::VcsData;
use crate::kinds::VcsKind;
use crate::locator::{Locator, RepositoryRoot};
use crate::watch::TreeWatch;

/// Cached view of a repository, refreshed only when its tree changes.
///
/// The branch is shared by every subpath; status is cached per subpath
/// (`None` is the whole tree) and only the queried slot is recomputed on a
/// refresh. Other slots keep their old value until queried again.
pub struct WatchedRepository {
    root: PathBuf,
    kind: Option<VcsKind>,
    branch: Option<String>,
    status: HashMap<Option<String>, String>,
    locator: Arc<Locator>,
    watcher: Box<dyn TreeWatch>,
}

impl WatchedRepository {
    pub fn new(root: RepositoryRoot, locator: Arc<Locator>, watcher: Box<dyn TreeWatch>) -> Self {
        Self {
            root: root.path,
            kind: Some(root.kind),
            branch: None,
            status: HashMap::new(),
            locator,
            watcher,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `None` once the repository has disappeared.
    pub fn kind(&self) -> Option<VcsKind> {
        self.kind
    }

    /// Branch and status for `subpath`, refreshing first if stale.
    pub fn data(&mut self, subpath: Option<&str>) -> VcsData {
        let key = subpath.map(str::to_string);

        // Watch asked last: a pending change outlives a refresh for a new slot
        if self.branch.is_none()
            || !self.status.contains_key(&key)
            || self.watcher.was_modified_since_last_call()
        {
            self.update(subpath);
        }

        VcsData {
            branch: self.branch.clone(),
            status: self.status.get(&key).cloned(),
        }
    }

    /// Recompute the branch and the status slot for `subpath`.
    pub fn update(&mut self, subpath: Option<&str>) {
        let located = self.locator.locate(&self.root);
        let backend = located
            .as_ref()
            .and_then(|root| self.locator.backend(root.kind));

        let (Some(located), Some(backend)) = (located, backend) else {
            debug!(root = %self.root.display(), "repository gone");
            self.kind = None;
            self.branch = None;
            self.status.clear();
            return;
        };

        debug!(root = %located.path.display(), kind = %located.kind, ?subpath, "refreshing");
        self.kind = Some(located.kind);
        self.root = located.path;
        self.branch = backend.branch_name(&self.root);

        let key = subpath.map(str::to_string);
        match backend.status(&self.root, subpath) {
            Some(status) => {
                self.status.insert(key, status);
            }
            None => {
                self.status.remove(&key);
            }
        }
    }
}
