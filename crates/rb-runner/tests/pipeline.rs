use std::path::{Path, PathBuf};

use rb_core::Provider;
use rb_runner::{CaseStoreError, EvaluateRequest, Invoker, Runner};
use rb_validate::{Severity, ValidationCategory, POML_SKIP_NOTE};
use rb_vcs::FixedSha;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn copy_dir(src: &Path, dst: &Path) {
    std::fs::create_dir_all(dst).unwrap();
    for entry in std::fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// A throwaway repo root holding the fixture bench tree and recipes.
fn repo() -> (TempDir, Runner) {
    let dir = tempdir().unwrap();
    copy_dir(&fixtures(), dir.path());
    copy_dir(&fixtures().join("../schema"), &dir.path().join("schema"));
    let runner = Runner::open(dir.path().to_path_buf())
        .unwrap()
        .with_sha_source(Box::new(FixedSha(Some("abc123".into()))));
    (dir, runner)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

fn results_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(rd) => rd.map(|e| e.unwrap().path()).collect(),
        Err(_) => vec![],
    }
}

#[test]
fn evaluate_then_aggregate_round_trips_totals() {
    let (dir, runner) = repo();
    let mut req = EvaluateRequest::new("sample-task");
    req.recipe = Some(PathBuf::from("recipes/ai-engineer.poml"));
    req.provider = Some(Provider::Qwen);
    req.model = Some("Qwen2.5-Coder".into());
    req.variants = Some("terse,cot".into());

    let out = runner.evaluate(&req).unwrap();
    assert!(out.validation.ok, "{:?}", out.validation.errors);
    let strict: Vec<_> = out.validation.findings.iter().filter(|f| f.category == ValidationCategory::Schema).collect();
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].message, POML_SKIP_NOTE);
    assert!(out.output.starts_with(dir.path().join("bench/sample-task/results")));
    let name = out.output.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("results_") && name.ends_with("Z.json"), "{name}");

    let written = read_json(&out.output);
    assert_eq!(written["bench_id"], "sample-task");
    assert_eq!(written["provider"], "qwen");
    assert_eq!(written["variants"], json!(["terse", "cot"]));
    assert_eq!(written["totals"]["cases"], 3);
    assert_eq!(written["totals"]["passed"], 2);
    assert_eq!(written["totals"]["accuracy"], 0.6667);
    assert_eq!(written["cases"][1]["id"], "c2");
    assert_eq!(written["cases"][1]["passed"], false);

    let agg = runner.aggregate().unwrap();
    assert_eq!(agg.artifacts, 1);
    assert_eq!(agg.bench_count, 1);
    let lock = read_json(&agg.lockfile);
    assert_eq!(lock["version"], "0.1.0");
    assert_eq!(lock["release"]["sha"], "abc123");
    let rec = &lock["metrics"]["sample-task"]["qwen"]["Qwen2.5-Coder"]["variants"]["terse+cot"];
    assert_eq!(rec["accuracy"], out.summary.totals.accuracy);
    let latency = rec["avg_latency_ms"].as_f64().unwrap();
    assert!((latency - out.summary.totals.avg_latency_ms).abs() < 0.005);
    assert_eq!(rec["tool_calls"], 0);
}

#[test]
fn bench_id_falls_back_to_task_without_recipe() {
    let (_dir, runner) = repo();
    let mut req = EvaluateRequest::new("sample-task");
    req.cases = "c1".into();
    let out = runner.evaluate(&req).unwrap();
    assert_eq!(out.summary.bench_id, "sample-task");
    assert_eq!(out.summary.provider, None);
    assert_eq!(out.summary.variants, None);
    assert_eq!(out.summary.totals.accuracy, 1.0);
    assert!(!out.validation.ok);
}

#[test]
fn missing_tools_warns_but_still_writes_summary() {
    let (_dir, runner) = repo();
    let mut req = EvaluateRequest::new("sample-task");
    req.recipe = Some(PathBuf::from("recipes/missing-tools.md"));
    let out = runner.evaluate(&req).unwrap();
    assert!(!out.validation.ok);
    assert!(out.validation.errors.iter().any(|e| e == "header.tools: missing"));
    assert!(out.output.exists());

    let schema = out
        .validation
        .findings
        .iter()
        .find(|f| f.category == ValidationCategory::Schema)
        .unwrap();
    assert_eq!(schema.severity, Severity::Warn);
    assert!(schema.message.starts_with("schema: validation error:"), "{}", schema.message);
    assert!(!out.validation.errors.contains(&schema.message));
}

#[test]
fn empty_case_directory_aborts_without_artifact() {
    let (dir, runner) = repo();
    std::fs::create_dir_all(dir.path().join("bench/empty-task/cases")).unwrap();
    let err = runner.evaluate(&EvaluateRequest::new("empty-task")).unwrap_err();
    assert!(matches!(err.downcast_ref::<CaseStoreError>(), Some(CaseStoreError::NoCases { .. })));
    assert!(results_in(&dir.path().join("bench/empty-task/results")).is_empty());
}

#[test]
fn unmatched_selector_aborts_without_artifact() {
    let (dir, runner) = repo();
    let mut req = EvaluateRequest::new("sample-task");
    req.cases = "nope,also-nope".into();
    let err = runner.evaluate(&req).unwrap_err();
    assert!(matches!(err.downcast_ref::<CaseStoreError>(), Some(CaseStoreError::NoMatch { .. })));
    assert!(results_in(&dir.path().join("bench/sample-task/results")).is_empty());
}

#[test]
fn explicit_output_path_is_used() {
    let (dir, runner) = repo();
    let mut req = EvaluateRequest::new("sample-task");
    req.output = Some(PathBuf::from("out/run.json"));
    let out = runner.evaluate(&req).unwrap();
    assert_eq!(out.output, dir.path().join("out/run.json"));
    assert!(results_in(&dir.path().join("bench/sample-task/results")).is_empty());
}

struct Shouting;

impl Invoker for Shouting {
    fn invoke(&self, input: &str) -> String {
        format!("{} BAR", input.to_uppercase())
    }
}

#[test]
fn invoker_is_pluggable() {
    let (_dir, runner) = repo();
    let out = runner.evaluate_with(&EvaluateRequest::new("sample-task"), &Shouting).unwrap();
    assert_eq!(out.summary.totals.passed, 3);
    assert_eq!(out.summary.cases[0].response_preview, "HELLO WORLD BAR");
}

#[test]
fn aggregate_with_no_artifacts_writes_empty_lock() {
    let dir = tempdir().unwrap();
    let runner = Runner::open(dir.path().to_path_buf()).unwrap().with_sha_source(Box::new(FixedSha(None)));
    let agg = runner.aggregate().unwrap();
    assert_eq!(agg.artifacts, 0);
    assert_eq!(agg.bench_count, 0);
    let lock = read_json(&agg.lockfile);
    assert_eq!(lock["metrics"], json!({}));
    assert_eq!(lock["release"]["sha"], "UNSET");
}

fn write_artifact(root: &Path, rel: &str, ended_at: &str, accuracy: f64) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let doc = json!({
        "bench_id": "b",
        "provider": "openai",
        "model": "gpt-5",
        "variants": null,
        "started_at": ended_at,
        "ended_at": ended_at,
        "totals": {"cases": 4, "passed": 1, "accuracy": accuracy, "avg_latency_ms": 1.0, "tool_calls": 0},
        "cases": [],
    });
    std::fs::write(path, serde_json::to_vec_pretty(&doc).unwrap()).unwrap();
}

#[test]
fn aggregate_keeps_latest_and_skips_corrupt_artifacts() {
    let dir = tempdir().unwrap();
    let bench = dir.path().join("bench");
    // lexicographically first, but newest
    write_artifact(&bench, "a/results/results_1.json", "2026-02-01T00:00:00Z", 0.9);
    write_artifact(&bench, "a/results/results_2.json", "2026-01-01T00:00:00Z", 0.1);
    write_artifact(&bench, "z/nested/results/results_3.json", "2026-01-15T00:00:00Z", 0.5);
    std::fs::write(bench.join("a/results/results_4.json"), "{ not json").unwrap();

    let runner = Runner::open(dir.path().to_path_buf()).unwrap().with_sha_source(Box::new(FixedSha(None)));
    let agg = runner.aggregate().unwrap();
    assert_eq!(agg.artifacts, 3);
    assert_eq!(agg.skipped, 1);

    let lock = read_json(&agg.lockfile);
    assert_eq!(lock["metrics"]["b"]["openai"]["gpt-5"]["variants"]["default"]["accuracy"], 0.9);
}

#[test]
fn aggregate_tie_goes_to_last_path_in_order() {
    let dir = tempdir().unwrap();
    let bench = dir.path().join("bench");
    write_artifact(&bench, "a/results/results_1.json", "2026-01-01T00:00:00Z", 0.1);
    write_artifact(&bench, "a/results/results_2.json", "2026-01-01T00:00:00Z", 0.2);

    let runner = Runner::open(dir.path().to_path_buf()).unwrap().with_sha_source(Box::new(FixedSha(None)));
    let lock = read_json(&runner.aggregate().unwrap().lockfile);
    assert_eq!(lock["metrics"]["b"]["openai"]["gpt-5"]["variants"]["default"]["accuracy"], 0.2);
}

#[test]
fn config_file_redirects_paths() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("bench.toml"), "[bench]\nroot = \"suites\"\n\n[lock]\npath = \"out/metrics.lock.json\"\n").unwrap();
    write_artifact(&dir.path().join("suites"), "t/results/r.json", "2026-01-01T00:00:00Z", 0.5);

    let runner = Runner::open(dir.path().to_path_buf()).unwrap().with_sha_source(Box::new(FixedSha(None)));
    let agg = runner.aggregate().unwrap();
    assert_eq!(agg.lockfile, dir.path().join("out/metrics.lock.json"));
    assert_eq!(agg.artifacts, 1);
}
