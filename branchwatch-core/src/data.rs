//! Query result types.

use serde::{Deserialize, Serialize};

/// Branch and status for a queried path.
///
/// `status` is a short code: the two-character porcelain prefix for a subpath
/// query, or a three-column `worktree/index/untracked` string for the whole
/// tree. An empty string means clean. Both fields are `None` when no
/// repository applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VcsData {
    /// Current branch name, or a short commit id when detached.
    pub branch: Option<String>,
    /// Status code for the queried subpath (or whole tree).
    pub status: Option<String>,
}

impl VcsData {
    /// Result for paths outside any recognized repository.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether the status reports any change.
    pub fn is_dirty(&self) -> bool {
        self.status.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}
