//! Errors raised on the internal seams (watchers, command runners).
//!
//! None of these cross [`crate::RepositoryRegistry::query`]; they are logged
//! and turned into degraded values where they are caught.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("Failed to create watcher: {0}")]
    WatcherCreation(#[from] notify::Error),

    #[error("Failed to watch path {path}: {source}")]
    WatchPath {
        path: PathBuf,
        source: notify::Error,
    },

    #[error("Failed to run {program} in {cwd}: {source}")]
    Spawn {
        program: String,
        cwd: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, VcsError>;
