use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::CaseId;

/// One evaluation unit loaded from `<task>/cases/*.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchCase {
    #[serde(default)]
    pub id: CaseId,
    #[serde(default = "empty_input")]
    pub input: Value,
    #[serde(default)]
    pub expected: Expected,
}

fn empty_input() -> Value {
    Value::String(String::new())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Expected {
    /// Substrings that must all appear in the response (case-insensitive).
    #[serde(default)]
    pub contains: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub id: CaseId,
    pub passed: bool,
    pub latency_ms: f64,
    pub tool_calls: u64,
    pub checks: Checks,
    pub response_preview: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checks {
    pub contains: ContainsCheck,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainsCheck {
    pub expected: Vec<String>,
    pub ok: bool,
}
