use std::path::{Path, PathBuf};

use anyhow::Result;
use rb_artifacts::{ArtifactStore, FsArtifactStore};
use rb_core::{now_utc, Provider, RecipeHeader, RunSummary, TaskId};
use rb_recipe::{resolve_header, RecipeFormat};
use rb_validate::{strict_finding, validate_minimal, Finding, ValidationReport, POML_SKIP_NOTE};
use rb_vcs::{GitShaSource, ReleaseShaSource};

use crate::aggregate::{build_lock, scan_artifacts};
use crate::cases::load_cases;
use crate::evaluator::evaluate_case;
use crate::invoke::{EchoInvoker, Invoker, ProviderAdapter};
use crate::summary::{build_summary, parse_variants, RunContext};
use crate::Config;

#[derive(Clone, Debug)]
pub struct EvaluateRequest {
    pub task: TaskId,
    /// `all` or comma-separated case ids.
    pub cases: String,
    pub recipe: Option<PathBuf>,
    pub provider: Option<Provider>,
    pub model: Option<String>,
    /// Comma-separated variant ids.
    pub variants: Option<String>,
    pub output: Option<PathBuf>,
}

impl EvaluateRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: TaskId::from_str(task),
            cases: "all".to_string(),
            recipe: None,
            provider: None,
            model: None,
            variants: None,
            output: None,
        }
    }
}

#[derive(Debug)]
pub struct EvaluateOutcome {
    pub output: PathBuf,
    pub summary: RunSummary,
    pub validation: ValidationReport,
}

#[derive(Debug)]
pub struct AggregateOutcome {
    pub lockfile: PathBuf,
    pub artifacts: usize,
    pub skipped: usize,
    pub bench_count: usize,
}

pub struct Runner {
    pub repo_root: PathBuf,
    pub cfg: Config,
    pub artifacts: FsArtifactStore,
    pub sha_source: Box<dyn ReleaseShaSource>,
}

impl Runner {
    pub fn open(repo_root: PathBuf) -> Result<Self> {
        let cfg = Config::load_or_default(&repo_root)?;
        let artifacts = FsArtifactStore::new(cfg.bench_root(&repo_root), cfg.lock_path(&repo_root));
        let sha_source = Box::new(GitShaSource::new(repo_root.clone()));
        Ok(Self { repo_root, cfg, artifacts, sha_source })
    }

    pub fn with_sha_source(mut self, source: Box<dyn ReleaseShaSource>) -> Self {
        self.sha_source = source;
        self
    }

    /// Evaluate a task through the invoker matching the requested provider.
    pub fn evaluate(&self, req: &EvaluateRequest) -> Result<EvaluateOutcome> {
        self.run_evaluation(req, None)
    }

    /// Evaluate a task through a caller-supplied invoker.
    pub fn evaluate_with(&self, req: &EvaluateRequest, invoker: &dyn Invoker) -> Result<EvaluateOutcome> {
        self.run_evaluation(req, Some(invoker))
    }

    fn run_evaluation(&self, req: &EvaluateRequest, invoker: Option<&dyn Invoker>) -> Result<EvaluateOutcome> {
        let cases = load_cases(&self.artifacts.layout, &req.task, &req.cases)?;

        let recipe = req.recipe.as_ref().map(|p| self.repo_root.join(p));
        let header = resolve_header(recipe.as_deref());
        let validation = self.check_header(recipe.as_deref(), &header);

        let fallback;
        let selected: &dyn Invoker = match invoker {
            Some(inv) => inv,
            None => {
                fallback = self.default_invoker(req, &header);
                fallback.as_ref()
            }
        };

        let ctx = RunContext {
            bench_id: header.bench_id().map(str::to_string).unwrap_or_else(|| req.task.to_string()),
            provider: req.provider,
            model: req.model.clone(),
            variants: parse_variants(req.variants.as_deref()),
        };

        let started_at = now_utc();
        let results = cases
            .iter()
            .map(|c| evaluate_case(c, selected, self.cfg.bench.preview_chars))
            .collect();
        let ended_at = now_utc();
        let summary = build_summary(ctx, started_at, ended_at, results);

        let output = match &req.output {
            Some(path) => {
                let path = self.repo_root.join(path);
                self.artifacts.write_summary_to(&path, &summary)?;
                path
            }
            None => self.artifacts.create_summary(&req.task, &summary)?,
        };
        tracing::info!(
            output = %output.display(),
            cases = summary.totals.cases,
            passed = summary.totals.passed,
            "run summary written"
        );

        Ok(EvaluateOutcome { output, summary, validation })
    }

    fn default_invoker(&self, req: &EvaluateRequest, header: &RecipeHeader) -> Box<dyn Invoker> {
        let Some(provider) = req.provider else {
            return Box::new(EchoInvoker);
        };
        let adapter = ProviderAdapter::new(provider, req.model.clone(), header.tool_aliases().unwrap_or_default());
        let tools = header.tools().unwrap_or_default();
        tracing::debug!(
            provider = %provider,
            tool_choice = %adapter.tool_choice(header.tool_mode()),
            tools = %adapter.tool_declarations(&tools),
            "provider adapter configured"
        );
        Box::new(adapter)
    }

    /// Minimal check always; strict schema check for frontmatter recipes only.
    /// Both are advisory.
    fn check_header(&self, recipe: Option<&Path>, header: &RecipeHeader) -> ValidationReport {
        let mut report = validate_minimal(header);
        if !report.ok {
            tracing::warn!("header validation warnings:");
            for e in &report.errors {
                tracing::warn!("- {e}");
            }
        }

        let strict = match recipe.and_then(RecipeFormat::from_path) {
            Some(RecipeFormat::DelimitedBlock) => strict_finding(&self.cfg.schema_path(&self.repo_root), header),
            Some(RecipeFormat::TagBased) => Some(Finding::schema_warning(POML_SKIP_NOTE)),
            None => {
                tracing::debug!("no recognized recipe; strict schema validation skipped");
                None
            }
        };
        if let Some(finding) = strict {
            tracing::warn!("{}", finding.message);
            report.findings.push(finding);
        }
        report
    }

    /// Rebuild the lockfile from every run artifact currently on disk.
    pub fn aggregate(&self) -> Result<AggregateOutcome> {
        let paths = self.artifacts.discover_summaries()?;
        if paths.is_empty() {
            tracing::warn!("No results found; nothing to aggregate");
        }

        let (agg, stats) = scan_artifacts(&self.artifacts, &paths);
        let lock = build_lock(agg.into_metrics(), &self.cfg.lock.version, self.sha_source.as_ref(), now_utc());
        let lockfile = self.artifacts.write_lock(&lock)?;
        tracing::info!(lockfile = %lockfile.display(), artifacts = stats.artifacts, skipped = stats.skipped, "lockfile written");

        Ok(AggregateOutcome {
            lockfile,
            artifacts: stats.artifacts,
            skipped: stats.skipped,
            bench_count: lock.metrics.len(),
        })
    }
}
