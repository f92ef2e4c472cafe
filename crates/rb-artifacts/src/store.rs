use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rb_core::{LockFile, RunSummary, TaskId};
use walkdir::WalkDir;

use crate::layout::BenchLayout;

const MAX_NAME_ATTEMPTS: usize = 1000;

pub trait ArtifactStore: Send + Sync {
    /// Write a run artifact under the default naming scheme without replacing any existing file.
    fn create_summary(&self, task: &TaskId, summary: &RunSummary) -> Result<PathBuf>;
    /// Write a run artifact to an explicit path, replacing whatever is there.
    fn write_summary_to(&self, path: &Path, summary: &RunSummary) -> Result<()>;
    /// All run artifacts under the bench root, in lexicographic path order.
    fn discover_summaries(&self) -> Result<Vec<PathBuf>>;
    fn read_artifact(&self, path: &Path) -> Result<serde_json::Value>;
    fn write_lock(&self, lock: &LockFile) -> Result<PathBuf>;
}

#[derive(Clone)]
pub struct FsArtifactStore {
    pub layout: BenchLayout,
    pub lock_path: PathBuf,
}

impl FsArtifactStore {
    pub fn new(bench_root: PathBuf, lock_path: PathBuf) -> Self {
        Self { layout: BenchLayout::new(bench_root), lock_path }
    }

    fn candidate_path(base: &Path, attempt: usize) -> PathBuf {
        if attempt == 0 {
            return base.to_path_buf();
        }
        let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("results");
        base.with_file_name(format!("{stem}_{attempt}.json"))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn create_summary(&self, task: &TaskId, summary: &RunSummary) -> Result<PathBuf> {
        let dir = self.layout.results_dir(task);
        std::fs::create_dir_all(&dir).with_context(|| format!("create results dir {}", dir.display()))?;
        let bytes = serde_json::to_vec_pretty(summary)?;
        let base = self.layout.default_summary_path(task, &summary.ended_at);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = Self::candidate_path(&base, attempt);
            match std::fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut f) => {
                    f.write_all(&bytes).with_context(|| format!("write summary {}", path.display()))?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "artifact name taken");
                }
                Err(e) => return Err(e).with_context(|| format!("create summary {}", path.display())),
            }
        }
        Err(anyhow!("no free artifact name next to {}", base.display()))
    }

    fn write_summary_to(&self, path: &Path, summary: &RunSummary) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(summary)?;
        std::fs::write(path, bytes).with_context(|| format!("write summary {}", path.display()))?;
        Ok(())
    }

    fn discover_summaries(&self) -> Result<Vec<PathBuf>> {
        if !self.layout.root.is_dir() {
            return Ok(vec![]);
        }
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.layout.root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("skipping unreadable bench entry: {e}");
                    continue;
                }
            };
            if entry.file_type().is_file() && BenchLayout::is_result_artifact(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read_artifact(&self, path: &Path) -> Result<serde_json::Value> {
        let bytes = std::fs::read(path).with_context(|| format!("read artifact {}", path.display()))?;
        let value = serde_json::from_slice(&bytes).with_context(|| format!("parse artifact {}", path.display()))?;
        Ok(value)
    }

    fn write_lock(&self, lock: &LockFile) -> Result<PathBuf> {
        if let Some(parent) = self.lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(lock)?;
        std::fs::write(&self.lock_path, bytes).with_context(|| format!("write lockfile {}", self.lock_path.display()))?;
        Ok(self.lock_path.clone())
    }
}
