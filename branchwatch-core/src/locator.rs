//! Repository root discovery by walking up the directory tree.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::kinds::{Backend, KindRegistry, VcsKind};

/// A discovered repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRoot {
    pub kind: VcsKind,
    /// Directory holding the marker entry.
    pub path: PathBuf,
}

/// Finds the nearest enclosing repository of any registered kind.
#[derive(Debug, Clone)]
pub struct Locator {
    kinds: KindRegistry,
    excluded: Vec<String>,
}

impl Locator {
    /// `excluded` lists directory names that disqualify a marker found
    /// inside them (vendored trees that carry their own `.git`).
    pub fn new(kinds: KindRegistry, excluded: Vec<String>) -> Self {
        Self { kinds, excluded }
    }

    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    pub fn backend(&self, kind: VcsKind) -> Option<Arc<dyn Backend>> {
        self.kinds.get(kind).cloned()
    }

    /// Walk `path` and its ancestors, nearest first.
    pub fn locate(&self, path: &Path) -> Option<RepositoryRoot> {
        for dir in path.ancestors() {
            for backend in self.kinds.iter() {
                let marker = dir.join(backend.marker());
                if self.is_excluded(&marker) || !backend.marker_present(&marker) {
                    continue;
                }
                // Restricted submodule/worktree setups
                if marker.is_dir() && !searchable(&marker) {
                    debug!(marker = %marker.display(), "skipping unsearchable marker");
                    continue;
                }
                return Some(RepositoryRoot {
                    kind: backend.kind(),
                    path: dir.to_path_buf(),
                });
            }
        }
        None
    }

    fn is_excluded(&self, marker: &Path) -> bool {
        marker.components().any(|component| match component {
            Component::Normal(name) => self.excluded.iter().any(|e| name == OsStr::new(e)),
            _ => false,
        })
    }
}

#[cfg(unix)]
fn searchable(dir: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};
    access(dir, AccessFlags::X_OK).is_ok()
}

#[cfg(not(unix))]
fn searchable(_dir: &Path) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{GitBackend, InertBackend};
    use std::fs;

    fn git_locator() -> Locator {
        let mut kinds = KindRegistry::new();
        kinds.register(Arc::new(GitBackend::default()));
        Locator::new(kinds, vec!["qt5".to_string()])
    }

    #[test]
    fn test_no_repository() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        // A repository above the temp dir is outside this test's control
        let found = git_locator().locate(&nested);
        assert!(found.is_none_or(|root| !root.path.starts_with(dir.path())));
    }

    #[test]
    fn test_finds_nearest_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("outer/.git")).unwrap();
        fs::create_dir_all(dir.path().join("outer/inner/.git")).unwrap();
        fs::create_dir_all(dir.path().join("outer/inner/src")).unwrap();

        let root = git_locator()
            .locate(&dir.path().join("outer/inner/src"))
            .unwrap();
        assert_eq!(root.kind, VcsKind::Git);
        assert_eq!(root.path, dir.path().join("outer/inner"));
    }

    #[test]
    fn test_path_itself_is_checked_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let root = git_locator().locate(dir.path()).unwrap();
        assert_eq!(root.path, dir.path());
    }

    #[test]
    fn test_gitdir_file_counts_as_marker() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".git"), "gitdir: elsewhere\n").unwrap();

        let root = git_locator().locate(dir.path()).unwrap();
        assert_eq!(root.path, dir.path());
    }

    #[test]
    fn test_excluded_segment_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("outer/.git")).unwrap();
        fs::create_dir_all(dir.path().join("outer/qt5/.git")).unwrap();
        fs::create_dir_all(dir.path().join("outer/qt5/qtbase")).unwrap();

        let root = git_locator()
            .locate(&dir.path().join("outer/qt5/qtbase"))
            .unwrap();
        assert_eq!(root.path, dir.path().join("outer"));
    }

    #[test]
    fn test_excluded_only_repository() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("qt5/.git")).unwrap();

        let found = git_locator().locate(&dir.path().join("qt5"));
        assert!(found.is_none_or(|root| !root.path.starts_with(dir.path())));
    }

    #[test]
    fn test_excluded_matches_whole_component() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("qt5-tools/.git")).unwrap();

        let root = git_locator()
            .locate(&dir.path().join("qt5-tools"))
            .unwrap();
        assert_eq!(root.path, dir.path().join("qt5-tools"));
    }

    #[test]
    fn test_kinds_tried_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("repo/.hg")).unwrap();
        fs::create_dir_all(dir.path().join("repo/.git")).unwrap();

        let mut kinds = KindRegistry::new();
        kinds.register(Arc::new(InertBackend::new(VcsKind::Mercurial)));
        kinds.register(Arc::new(GitBackend::default()));
        let locator = Locator::new(kinds, vec![]);

        let root = locator.locate(&dir.path().join("repo")).unwrap();
        assert_eq!(root.kind, VcsKind::Mercurial);
    }

    #[test]
    fn test_inert_kind_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("outer/.git")).unwrap();
        fs::create_dir_all(dir.path().join("outer/inner")).unwrap();
        fs::write(dir.path().join("outer/inner/.hg"), "").unwrap();

        let mut kinds = KindRegistry::new();
        kinds.register(Arc::new(InertBackend::new(VcsKind::Mercurial)));
        kinds.register(Arc::new(GitBackend::default()));
        let locator = Locator::new(kinds, vec![]);

        let root = locator.locate(&dir.path().join("outer/inner")).unwrap();
        assert_eq!(root.kind, VcsKind::Git);
        assert_eq!(root.path, dir.path().join("outer"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unsearchable_marker_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("outer/.git")).unwrap();
        let inner_marker = dir.path().join("outer/inner/.git");
        fs::create_dir_all(&inner_marker).unwrap();
        fs::set_permissions(&inner_marker, fs::Permissions::from_mode(0o600)).unwrap();

        // Privileged users can search anything
        if searchable(&inner_marker) {
            fs::set_permissions(&inner_marker, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let root = git_locator()
            .locate(&dir.path().join("outer/inner"))
            .unwrap();
        assert_eq!(root.path, dir.path().join("outer"));

        fs::set_permissions(&inner_marker, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
