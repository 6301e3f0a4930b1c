//! Tunables for repository discovery.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::kinds::{GitBackend, InertBackend, KindRegistry, VcsKind};
use crate::locator::Locator;
use crate::runner::CommandRunner;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Kinds to look for, in priority order ("git", "hg", "bzr").
    pub kinds: Vec<String>,
    /// Directory names whose markers are ignored.
    pub exclude_dirs: Vec<String>,
    /// Git executable used for status queries.
    pub git_program: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kinds: vec!["git".to_string()],
            exclude_dirs: vec!["qt5".to_string()],
            git_program: "git".to_string(),
        }
    }
}

impl Settings {
    /// Build the kind registry. Unknown names are skipped.
    pub fn kind_registry(&self, runner: Arc<dyn CommandRunner>) -> KindRegistry {
        let mut registry = KindRegistry::new();
        for name in &self.kinds {
            match VcsKind::from_name(name) {
                Some(VcsKind::Git) => registry.register(Arc::new(GitBackend::new(
                    self.git_program.clone(),
                    runner.clone(),
                ))),
                Some(kind) => registry.register(Arc::new(InertBackend::new(kind))),
                None => warn!("unknown vcs kind {:?}, skipping", name),
            }
        }
        registry
    }

    pub fn locator(&self, runner: Arc<dyn CommandRunner>) -> Locator {
        Locator::new(self.kind_registry(runner), self.exclude_dirs.clone())
    }
}
