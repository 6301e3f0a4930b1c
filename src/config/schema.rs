use anyhow::{Context, Result};
use branchwatch_core::Settings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vcs: Settings,
    pub serve: ServeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Give up on a single query after this many milliseconds (0 = wait forever)
    pub timeout_ms: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self { timeout_ms: 2000 }
    }
}

impl ServeConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&super::config_path())
    }

    /// Read a config file. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}
