//! External command execution.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, VcsError};

/// Runs a command to completion and returns its decoded stdout lines.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<Vec<String>>;
}

/// Runs commands as child processes.
///
/// Blocks until the child exits. Stderr is discarded and the exit status is
/// not checked: whatever reached stdout is the answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<Vec<String>> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| VcsError::Spawn {
                program: program.to_string(),
                cwd: cwd.to_path_buf(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().map(str::to_string).collect())
    }
}
