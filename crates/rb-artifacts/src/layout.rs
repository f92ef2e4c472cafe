use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rb_core::{timestamp_token, TaskId};

pub const CASES_DIR: &str = "cases";
pub const RESULTS_DIR: &str = "results";

/// On-disk layout of a bench tree: `<root>/<task>/cases/*.json` and
/// `<root>/<task>/results/results_<token>.json`.
#[derive(Clone, Debug)]
pub struct BenchLayout {
    pub root: PathBuf,
}

impl BenchLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn cases_dir(&self, task: &TaskId) -> PathBuf {
        self.root.join(task.as_str()).join(CASES_DIR)
    }

    pub fn results_dir(&self, task: &TaskId) -> PathBuf {
        self.root.join(task.as_str()).join(RESULTS_DIR)
    }

    pub fn default_summary_path(&self, task: &TaskId, ended_at: &DateTime<Utc>) -> PathBuf {
        self.results_dir(task).join(format!("results_{}.json", timestamp_token(ended_at)))
    }

    /// True for `*.json` files directly inside a `results` directory.
    pub fn is_result_artifact(path: &Path) -> bool {
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let in_results = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            == Some(RESULTS_DIR);
        is_json && in_results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_path_uses_ended_at_token() {
        let layout = BenchLayout::new("bench");
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        let p = layout.default_summary_path(&TaskId::from_str("sample-task"), &at);
        assert_eq!(p, Path::new("bench/sample-task/results/results_20261016T083000Z.json"));
    }

    #[test]
    fn recognizes_result_artifacts() {
        assert!(BenchLayout::is_result_artifact(Path::new("bench/a/results/r.json")));
        assert!(BenchLayout::is_result_artifact(Path::new("bench/a/b/results/r.json")));
        assert!(!BenchLayout::is_result_artifact(Path::new("bench/a/cases/c.json")));
        assert!(!BenchLayout::is_result_artifact(Path::new("bench/a/results/notes.md")));
    }
}
