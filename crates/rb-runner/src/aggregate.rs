use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rb_artifacts::ArtifactStore;
use rb_core::{
    date_utc, parse_timestamp, round_to, variant_key, Fingerprint, LockFile, MetricRecord, MetricsTree, Release,
    UNKNOWN,
};
use rb_vcs::{release_sha_or_unset, ReleaseShaSource};
use serde_json::Value;

/// One artifact reduced to its fingerprint, metrics and end time.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactMetric {
    pub fingerprint: Fingerprint,
    pub record: MetricRecord,
    pub ended_at: DateTime<Utc>,
}

/// Reduce a parsed run artifact. Returns `None` when it is not a JSON object.
pub fn extract_metric(artifact: &Value) -> Option<ArtifactMetric> {
    let obj = artifact.as_object()?;
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    };
    let variants: Option<Vec<String>> = obj
        .get("variants")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect());

    let totals = obj.get("totals");
    let number = |key: &str| totals.and_then(|t| t.get(key)).and_then(Value::as_f64).unwrap_or(0.0);
    let tool_calls = totals
        .and_then(|t| t.get("tool_calls"))
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
        .unwrap_or(0);

    let ended_at = obj
        .get("ended_at")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or(DateTime::UNIX_EPOCH);

    Some(ArtifactMetric {
        fingerprint: Fingerprint {
            bench_id: text("bench_id"),
            provider: text("provider"),
            model: text("model"),
            variant_key: variant_key(variants.as_deref()),
        },
        record: MetricRecord {
            accuracy: number("accuracy"),
            avg_latency_ms: number("avg_latency_ms"),
            tool_calls,
        },
        ended_at,
    })
}

/// Latest-wins fold over artifacts, one slot per fingerprint.
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    slots: BTreeMap<Fingerprint, ArtifactMetric>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate. It replaces the held one when its `ended_at` is
    /// greater than or equal, so on a tie the later-offered artifact wins.
    pub fn offer(&mut self, metric: ArtifactMetric) {
        match self.slots.get(&metric.fingerprint) {
            Some(held) if metric.ended_at < held.ended_at => {}
            _ => {
                self.slots.insert(metric.fingerprint.clone(), metric);
            }
        }
    }

    /// Nest the resolved slots as `bench_id -> provider -> model -> variants`,
    /// rounding accuracy to 4 and latency to 2 decimal places.
    pub fn into_metrics(self) -> MetricsTree {
        let mut tree = MetricsTree::new();
        for (fp, metric) in self.slots {
            let record = MetricRecord {
                accuracy: round_to(metric.record.accuracy, 4),
                avg_latency_ms: round_to(metric.record.avg_latency_ms, 2),
                tool_calls: metric.record.tool_calls,
            };
            tree.entry(fp.bench_id)
                .or_default()
                .entry(fp.provider)
                .or_default()
                .entry(fp.model)
                .or_default()
                .variants
                .insert(fp.variant_key, record);
        }
        tree
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub artifacts: usize,
    pub skipped: usize,
}

/// Read every artifact in `paths`, in order, skipping the unreadable ones.
pub fn scan_artifacts(store: &dyn ArtifactStore, paths: &[PathBuf]) -> (MetricsAggregator, ScanStats) {
    let mut agg = MetricsAggregator::new();
    let mut stats = ScanStats::default();
    for path in paths {
        let metric = match store.read_artifact(path) {
            Ok(value) => {
                let metric = extract_metric(&value);
                if metric.is_none() {
                    tracing::warn!(path = %path.display(), "skipping artifact: not a run summary object");
                }
                metric
            }
            Err(e) => {
                tracing::warn!("skipping artifact: {e:#}");
                None
            }
        };
        match metric {
            Some(m) => {
                agg.offer(m);
                stats.artifacts += 1;
            }
            None => stats.skipped += 1,
        }
    }
    (agg, stats)
}

pub fn build_lock(
    metrics: MetricsTree,
    version: &str,
    sha_source: &dyn ReleaseShaSource,
    now: DateTime<Utc>,
) -> LockFile {
    LockFile {
        version: version.to_string(),
        release: Release { sha: release_sha_or_unset(sha_source), date: date_utc(&now) },
        metrics,
    }
}
