use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rb_artifacts::BenchLayout;
use rb_core::{BenchCase, CaseId, TaskId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaseStoreError {
    #[error("No cases found under {}", dir.display())]
    NoCases { dir: PathBuf },
    #[error("No cases matched the selector: {selector}")]
    NoMatch { selector: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaseSelector {
    All,
    Ids(Vec<CaseId>),
}

impl CaseSelector {
    /// `all` (any case) or empty selects everything; otherwise a comma-separated id list.
    pub fn parse(selector: &str) -> Self {
        if selector.trim().eq_ignore_ascii_case("all") {
            return CaseSelector::All;
        }
        let ids: Vec<CaseId> = selector
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(CaseId::from_str)
            .collect();
        if ids.is_empty() {
            CaseSelector::All
        } else {
            CaseSelector::Ids(ids)
        }
    }

    pub fn matches(&self, id: &CaseId) -> bool {
        match self {
            CaseSelector::All => true,
            CaseSelector::Ids(ids) => ids.contains(id),
        }
    }
}

/// Case documents of a task, sorted by filename.
pub fn case_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("list cases {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn read_case(path: &Path) -> Result<BenchCase> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read case {}", path.display()))?;
    let case: BenchCase = serde_json::from_str(&s).with_context(|| format!("parse case {}", path.display()))?;
    Ok(case)
}

/// Load the cases of `task` matching `selector`, in file order. Fails when the
/// task has no case documents or when nothing matches.
pub fn load_cases(layout: &BenchLayout, task: &TaskId, selector: &str) -> Result<Vec<BenchCase>> {
    let dir = layout.cases_dir(task);
    let paths = case_files(&dir)?;
    if paths.is_empty() {
        return Err(CaseStoreError::NoCases { dir }.into());
    }

    let sel = CaseSelector::parse(selector);
    let mut cases = Vec::new();
    for p in &paths {
        let case = read_case(p)?;
        if sel.matches(&case.id) {
            cases.push(case);
        }
    }
    if cases.is_empty() {
        return Err(CaseStoreError::NoMatch { selector: selector.to_string() }.into());
    }
    tracing::debug!(task = %task, selected = cases.len(), available = paths.len(), "cases loaded");
    Ok(cases)
}
