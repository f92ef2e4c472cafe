use chrono::{DateTime, Utc};
use rb_core::{round_to, CaseResult, Provider, RunSummary, Totals};

/// Who and what a run was evaluated for.
#[derive(Clone, Debug, Default)]
pub struct RunContext {
    pub bench_id: String,
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub variants: Option<Vec<String>>,
}

/// Split a comma-separated variant list; no usable identifiers means no variants.
pub fn parse_variants(raw: Option<&str>) -> Option<Vec<String>> {
    let variants: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    (!variants.is_empty()).then_some(variants)
}

/// Fold per-case results into run totals. Empty input yields zeros.
pub fn compute_totals(results: &[CaseResult]) -> Totals {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let (accuracy, avg_latency_ms) = if total == 0 {
        (0.0, 0.0)
    } else {
        let latency: f64 = results.iter().map(|r| r.latency_ms).sum();
        (passed as f64 / total as f64, latency / total as f64)
    };
    Totals {
        cases: total,
        passed,
        accuracy: round_to(accuracy, 4),
        avg_latency_ms: round_to(avg_latency_ms, 2),
        tool_calls: results.iter().map(|r| r.tool_calls).sum(),
    }
}

pub fn build_summary(
    ctx: RunContext,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    cases: Vec<CaseResult>,
) -> RunSummary {
    RunSummary {
        bench_id: ctx.bench_id,
        provider: ctx.provider,
        model: ctx.model,
        variants: ctx.variants,
        started_at,
        ended_at,
        totals: compute_totals(&cases),
        cases,
    }
}
