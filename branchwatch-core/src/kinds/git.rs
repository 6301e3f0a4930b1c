//! Git backend.

use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::warn;

use super::{Backend, VcsKind};
use crate::runner::{CommandRunner, ProcessRunner};

const MARKER: &str = ".git";

/// Lock file git creates in its metadata dir while touching the index.
const INDEX_LOCK: &str = "index.lock";

static REF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ref:\s*refs/heads/(.+)").expect("valid ref pattern"));

/// Reads `HEAD` directly and shells out to `git status` for the rest.
pub struct GitBackend {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl GitBackend {
    pub fn new(program: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }

    /// Resolve the metadata directory for `root`.
    ///
    /// Worktrees and submodules have a `.git` file containing
    /// `gitdir: <path>` instead of a directory.
    pub fn resolve_repo_dir(root: &Path) -> PathBuf {
        let marker = root.join(MARKER);
        let Ok(raw) = fs::read(&marker) else {
            return marker;
        };

        let target = match raw.iter().position(|&b| b == b':') {
            Some(colon) => &raw[colon + 1..],
            None => &raw[raw.len()..],
        };
        match std::str::from_utf8(target) {
            Ok(target) => normalize(&root.join(target.trim())),
            Err(_) => marker,
        }
    }

    /// Parse the contents of a `HEAD` file.
    pub fn parse_head(raw: &str) -> String {
        if let Some(caps) = REF_PATTERN.captures(raw) {
            return caps[1].trim().to_string();
        }
        // Detached HEAD
        raw.chars().take(7).collect()
    }

    /// Compose the whole-tree status from `git status --porcelain` lines.
    pub fn compose_tree_status<I, S>(lines: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut worktree = ' ';
        let mut index = ' ';
        let mut untracked = ' ';

        for line in lines {
            let mut chars = line.as_ref().chars();
            let first = match chars.next() {
                Some(c) => c,
                None => continue,
            };
            match first {
                '?' => {
                    untracked = 'U';
                    continue;
                }
                '!' => continue,
                _ => {}
            }

            if first != ' ' {
                index = 'I';
            }
            if chars.next().is_some_and(|c| c != ' ') {
                worktree = 'D';
            }
        }

        let composed: String = [worktree, index, untracked].iter().collect();
        if composed.trim().is_empty() {
            String::new()
        } else {
            composed
        }
    }

    fn git(&self, root: &Path, args: &[&str]) -> Vec<String> {
        match self.runner.run(&self.program, args, root) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("git status failed: {}", e);
                Vec::new()
            }
        }
    }
}

impl Default for GitBackend {
    fn default() -> Self {
        Self::new("git", Arc::new(ProcessRunner))
    }
}

impl Backend for GitBackend {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn marker(&self) -> &'static str {
        MARKER
    }

    // Either a directory or a worktree/submodule pointer file.
    fn marker_present(&self, marker: &Path) -> bool {
        marker.exists()
    }

    fn ignores_event(&self, dir: &Path, name: &str) -> bool {
        dir.ends_with(MARKER) && name == INDEX_LOCK
    }

    fn branch_name(&self, root: &Path) -> Option<String> {
        let head = Self::resolve_repo_dir(root).join("HEAD");
        let raw = fs::read(head).ok()?;
        let raw = String::from_utf8(raw).ok()?;
        Some(Self::parse_head(&raw))
    }

    fn status(&self, root: &Path, subpath: Option<&str>) -> Option<String> {
        let status: String = match subpath {
            Some(subpath) => self
                .git(root, &["status", "--porcelain", "--ignored", "--", subpath])
                .first()
                .map(|line| line.chars().take(2).collect())
                .unwrap_or_default(),
            None => Self::compose_tree_status(self.git(root, &["status", "--porcelain"])),
        };
        Some(status)
    }
}

/// Lexically collapse `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
