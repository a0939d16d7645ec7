// Concurrent batch loading of description files

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::parser::{self, Document};
use crate::query::DescFile;
use crate::utils::FileUtils;

/// How a batch of files is loaded
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Files parsed at the same time
    pub jobs: usize,
    /// Skip failing files with a warning instead of aborting
    pub keep_going: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            keep_going: false,
        }
    }
}

async fn load_one(path: PathBuf) -> (PathBuf, Result<Document>) {
    let task_path = path.clone();
    let result = tokio::task::spawn_blocking(move || parser::parse_desc(&task_path))
        .await
        .with_context(|| format!("Parser task failed for {}", path.display()))
        .and_then(|parsed| parsed);
    (path, result)
}

/// Parse `files` on the blocking pool, at most `options.jobs` at a time.
///
/// Results keep the order of `files`. Without `keep_going` the first failure
/// (in that order) is returned and the remaining work is dropped.
pub async fn load_descriptions(files: Vec<PathBuf>, options: LoadOptions) -> Result<Vec<DescFile>> {
    let jobs = options.jobs.max(1);
    info!("Loading {} description file(s) with {} job(s)", files.len(), jobs);

    let mut results = std::pin::pin!(stream::iter(files).map(load_one).buffered(jobs));
    let mut loaded = Vec::new();
    let mut skipped = 0usize;

    while let Some((path, result)) = results.next().await {
        match result {
            Ok(document) => {
                debug!(file = %path.display(), backend = %document.backend, "loaded");
                loaded.push(DescFile {
                    name: FileUtils::backend_name(&path),
                    path,
                    document,
                });
            }
            Err(e) if options.keep_going => {
                warn!("Skipping {}: {:#}", path.display(), e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        warn!("{} file(s) skipped", skipped);
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseError;

    fn write(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = ["c", "a", "b"]
            .iter()
            .map(|n| write(dir.path(), &format!("{n}.desc"), &format!(":backend \"{n}\"\n")))
            .collect();

        let loaded = load_descriptions(
            files,
            LoadOptions {
                jobs: 3,
                keep_going: false,
            },
        )
        .await
        .unwrap();

        let names: Vec<&str> = loaded.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(loaded[1].document.backend, "a");
    }

    #[tokio::test]
    async fn test_load_aborts_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write(dir.path(), "good.desc", ":backend \"good\"\n"),
            write(dir.path(), "bad.desc", ":backend \"bad\"\n:backend \"again\"\n"),
        ];

        let err = load_descriptions(files, LoadOptions::default())
            .await
            .unwrap_err();
        let parse_err = err.downcast_ref::<ParseError>().unwrap();
        assert_eq!(parse_err.file, "bad.desc");
        assert_eq!(parse_err.line, 2);
    }

    #[tokio::test]
    async fn test_load_keep_going_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            write(dir.path(), "bad.desc", ":devicetype :scanner\n"),
            write(dir.path(), "good.desc", ":backend \"good\"\n"),
            dir.path().join("missing.desc"),
        ];

        let loaded = load_descriptions(
            files,
            LoadOptions {
                jobs: 2,
                keep_going: true,
            },
        )
        .await
        .unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "good");
    }
}
