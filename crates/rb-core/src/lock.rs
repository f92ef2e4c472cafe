use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_VARIANT_KEY: &str = "default";
pub const UNKNOWN: &str = "unknown";

/// `bench_id -> provider -> model -> variants`.
pub type MetricsTree = BTreeMap<String, BTreeMap<String, BTreeMap<String, ModelMetrics>>>;

/// Reduced form of one run summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub accuracy: f64,
    pub avg_latency_ms: f64,
    pub tool_calls: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub variants: BTreeMap<String, MetricRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub sha: String,
    pub date: String,
}

/// Snapshot of the latest metric per fingerprint. Fully rebuilt on every aggregation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LockFile {
    pub version: String,
    pub release: Release,
    pub metrics: MetricsTree,
}

/// Identifies one metrics slot in the lockfile.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint {
    pub bench_id: String,
    pub provider: String,
    pub model: String,
    pub variant_key: String,
}

/// `+`-joined variants in the order given, or `default` when there are none.
pub fn variant_key(variants: Option<&[String]>) -> String {
    match variants {
        Some(v) if !v.is_empty() => v.join("+"),
        _ => DEFAULT_VARIANT_KEY.to_string(),
    }
}

/// Round to `places` decimals, ties to even.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
