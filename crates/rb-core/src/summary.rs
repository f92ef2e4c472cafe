use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::case::CaseResult;
use crate::model::Provider;

/// Persisted result of one evaluation pass. Written once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub bench_id: String,
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub variants: Option<Vec<String>>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub totals: Totals,
    pub cases: Vec<CaseResult>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub cases: usize,
    pub passed: usize,
    pub accuracy: f64,
    pub avg_latency_ms: f64,
    pub tool_calls: u64,
}
