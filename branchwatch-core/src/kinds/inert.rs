//! Placeholder backends for kinds without branch/status support.

use std::path::Path;

use super::{Backend, VcsKind};

/// Recognizes a repository by its marker directory but reports nothing.
#[derive(Debug, Clone, Copy)]
pub struct InertBackend {
    kind: VcsKind,
}

impl InertBackend {
    pub fn new(kind: VcsKind) -> Self {
        Self { kind }
    }
}

impl Backend for InertBackend {
    fn kind(&self) -> VcsKind {
        self.kind
    }

    fn marker(&self) -> &'static str {
        match self.kind {
            VcsKind::Git => ".git",
            VcsKind::Mercurial => ".hg",
            VcsKind::Bazaar => ".bzr",
        }
    }

    fn marker_present(&self, marker: &Path) -> bool {
        marker.is_dir()
    }

    fn branch_name(&self, _root: &Path) -> Option<String> {
        None
    }

    fn status(&self, _root: &Path, _subpath: Option<&str>) -> Option<String> {
        None
    }
}
