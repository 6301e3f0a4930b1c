mod config;
mod paths;
mod serve;

use anyhow::Result;
use branchwatch_core::RepositoryRegistry;
use config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
Usage:
  branchwatch [PATH] [SUBPATH]   print branch and status for PATH as JSON
  branchwatch serve              answer PATH[<TAB>SUBPATH] lines from stdin

Config: ~/.config/branchwatch/config.toml (override with BRANCHWATCH_CONFIG)";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let first = args.next();

    match first.as_deref() {
        Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some("-V") | Some("--version") => {
            println!("branchwatch v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load().unwrap_or_else(|e| {
        warn!("{:#}; using default config", e);
        Config::default()
    });
    if config.vcs.kinds.is_empty() {
        warn!("no vcs kinds configured, every query will come back empty");
    }
    let registry = Arc::new(RepositoryRegistry::from_settings(&config.vcs));

    if first.as_deref() == Some("serve") {
        return serve::run(registry, config.serve.timeout()).await;
    }

    let path = match first {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    let subpath = args.next();
    let request = serve::Request { path, subpath };
    let data = serve::answer(registry, request, config.serve.timeout()).await;

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

/// Log to stderr so stdout stays machine readable. `RUST_LOG` overrides the
/// default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
