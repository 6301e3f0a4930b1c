//! VCS backends.
//!
//! Each backend knows its marker entry (`.git`, `.hg`, ...) and how to read
//! branch and status for a root. Only git is complete; the others are inert
//! placeholders so the locator can be exercised with more than one kind.

pub mod git;
pub mod inert;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use git::GitBackend;
pub use inert::InertBackend;

/// Supported repository kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
    Mercurial,
    Bazaar,
}

impl VcsKind {
    pub fn name(&self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Mercurial => "mercurial",
            VcsKind::Bazaar => "bzr",
        }
    }

    /// Parse a kind from its config name. Accepts the short tool names too.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "git" => Some(VcsKind::Git),
            "mercurial" | "hg" => Some(VcsKind::Mercurial),
            "bazaar" | "bzr" => Some(VcsKind::Bazaar),
            _ => None,
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-kind capabilities used by the locator and the cache.
pub trait Backend: Send + Sync {
    fn kind(&self) -> VcsKind;

    /// Name of the marker entry that sits at a repository root.
    fn marker(&self) -> &'static str;

    /// Whether an existing-or-not marker path counts as present for this kind.
    fn marker_present(&self, marker: &Path) -> bool;

    /// Filesystem events the backend causes itself and that should not
    /// invalidate the cache. `dir` is the directory the event happened in.
    fn ignores_event(&self, _dir: &Path, _name: &str) -> bool {
        false
    }

    /// Current branch, or `None` when it cannot be determined.
    fn branch_name(&self, root: &Path) -> Option<String>;

    /// Status code for `subpath`, or for the whole tree when `None`.
    /// Returns `None` when the backend has no status support.
    fn status(&self, root: &Path, subpath: Option<&str>) -> Option<String>;
}

/// Ordered set of registered backends. Ascension tries them in order.
#[derive(Clone, Default)]
pub struct KindRegistry {
    backends: Vec<Arc<dyn Backend>>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend, replacing any previously registered one of the same kind.
    pub fn register(&mut self, backend: Arc<dyn Backend>) {
        let kind = backend.kind();
        match self.backends.iter_mut().find(|b| b.kind() == kind) {
            Some(existing) => *existing = backend,
            None => self.backends.push(backend),
        }
    }

    pub fn get(&self, kind: VcsKind) -> Option<&Arc<dyn Backend>> {
        self.backends.iter().find(|b| b.kind() == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Backend>> {
        self.backends.iter()
    }

    pub fn kinds(&self) -> Vec<VcsKind> {
        self.backends.iter().map(|b| b.kind()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
