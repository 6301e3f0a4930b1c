//! Where branchwatch looks for its config.
//!
//! `~/.config/branchwatch/` is used unless only the older `~/.branchwatch/`
//! exists.

use std::path::PathBuf;

/// Directory holding `config.toml`.
///
/// Without a home directory the lookup is relative to the working directory.
pub fn config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

    let xdg = home.join(".config").join("branchwatch");
    let legacy = home.join(".branchwatch");

    if legacy.exists() && !xdg.exists() {
        legacy
    } else {
        xdg
    }
}

pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
