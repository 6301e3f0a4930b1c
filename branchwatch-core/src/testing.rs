//! Test doubles for the runner and watch seams.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::runner::CommandRunner;
use crate::watch::{IgnoreFn, TreeWatch, WatchFactory};

/// Returns the same lines for every command and records the arguments.
pub struct FakeRunner {
    lines: Vec<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, _program: &str, args: &[&str], _cwd: &Path) -> Result<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .push(args.iter().map(|a| a.to_string()).collect());
        Ok(self.lines.clone())
    }
}

/// Watch whose flag is flipped by the test.
#[derive(Clone, Default)]
pub struct ManualWatch {
    modified: Arc<AtomicBool>,
}

impl ManualWatch {
    pub fn touch(&self) {
        self.modified.store(true, Ordering::SeqCst);
    }
}

impl TreeWatch for ManualWatch {
    fn was_modified_since_last_call(&self) -> bool {
        self.modified.swap(false, Ordering::SeqCst)
    }
}

/// Hands out [`ManualWatch`]es and keeps a handle to each one.
#[derive(Default)]
pub struct ManualWatchFactory {
    created: Mutex<Vec<(PathBuf, ManualWatch)>>,
    filtered: AtomicUsize,
}

impl ManualWatchFactory {
    pub fn watches(&self) -> Vec<(PathBuf, ManualWatch)> {
        self.created.lock().unwrap().clone()
    }

    /// Number of watches created with an ignore predicate.
    pub fn filtered(&self) -> usize {
        self.filtered.load(Ordering::SeqCst)
    }
}

impl WatchFactory for ManualWatchFactory {
    fn watch(&self, root: &Path, ignore: Option<IgnoreFn>) -> Result<Box<dyn TreeWatch>> {
        if ignore.is_some() {
            self.filtered.fetch_add(1, Ordering::SeqCst);
        }
        let watch = ManualWatch::default();
        self.created
            .lock()
            .unwrap()
            .push((root.to_path_buf(), watch.clone()));
        Ok(Box::new(watch))
    }
}
