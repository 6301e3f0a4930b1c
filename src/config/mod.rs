mod schema;

pub use schema::Config;

use std::path::PathBuf;

use crate::paths;

/// Environment variable that points at an alternate config file.
const CONFIG_ENV: &str = "BRANCHWATCH_CONFIG";

/// Get the config file path.
/// `BRANCHWATCH_CONFIG` wins over the per-user location.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(paths::config_file)
}
