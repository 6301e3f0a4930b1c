//! branchwatch-core - Cached VCS branch and status for shell prompts.
//!
//! Prompts ask for the branch and status of the current directory on every
//! redraw. This library answers from a cache and only goes back to the
//! repository after a filesystem watch reports that the tree changed.
//!
//! # Example
//!
//! ```no_run
//! use branchwatch_core::{RepositoryRegistry, Settings};
//!
//! let registry = RepositoryRegistry::from_settings(&Settings::default());
//! let data = registry.query(".", None);
//! println!("{:?} {:?}", data.branch, data.status);
//! ```

mod data;
pub mod error;
pub mod kinds;
mod locator;
mod registry;
pub mod runner;
mod settings;
pub mod watch;
mod watched;

#[cfg(test)]
mod testing;

pub use data::VcsData;
pub use error::VcsError;
pub use kinds::{Backend, GitBackend, KindRegistry, VcsKind};
pub use locator::{Locator, RepositoryRoot};
pub use registry::RepositoryRegistry;
pub use runner::{CommandRunner, ProcessRunner};
pub use settings::Settings;
pub use watch::{NotifyWatchFactory, TreeWatch, WatchFactory};
pub use watched::WatchedRepository;
