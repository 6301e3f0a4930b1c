//! Line-oriented query server for prompts.
//!
//! Reads `PATH[<TAB>SUBPATH]` lines from stdin and writes one JSON object
//! per line to stdout. The registry stays alive between lines, which is
//! what makes repeated prompt queries cheap.

use anyhow::Result;
use branchwatch_core::{RepositoryRegistry, VcsData};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

/// A parsed request line.
#[derive(Debug, PartialEq, Eq)]
pub struct Request {
    pub path: PathBuf,
    pub subpath: Option<String>,
}

/// Parse one input line. Blank lines give `None`.
pub fn parse_request(line: &str) -> Option<Request> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let (path, subpath) = match line.split_once('\t') {
        Some((path, subpath)) => (path, Some(subpath)),
        None => (line, None),
    };
    Some(Request {
        path: PathBuf::from(path),
        subpath: subpath.filter(|s| !s.is_empty()).map(str::to_string),
    })
}

/// Serve requests until stdin closes.
pub async fn run(registry: Arc<RepositoryRegistry>, timeout: Option<Duration>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let Some(request) = parse_request(&line) else {
            continue;
        };
        let data = answer(Arc::clone(&registry), request, timeout).await;

        let mut out = serde_json::to_string(&data)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Run one query off the async runtime, bounded by `timeout`.
///
/// A query that times out keeps running in the background and holds its
/// repository entry until git returns.
pub async fn answer(
    registry: Arc<RepositoryRegistry>,
    request: Request,
    timeout: Option<Duration>,
) -> VcsData {
    let path = request.path.clone();
    let task = tokio::task::spawn_blocking(move || {
        registry.query(&request.path, request.subpath.as_deref())
    });

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(result) => result,
            Err(_) => {
                warn!("query for {} timed out after {:?}", path.display(), limit);
                return VcsData::none();
            }
        },
        None => task.await,
    };

    result.unwrap_or_else(|e| {
        warn!("query for {} failed: {}", path.display(), e);
        VcsData::none()
    })
}
