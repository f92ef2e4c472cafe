use rb_core::RecipeHeader;
use serde::{Deserialize, Serialize};

use crate::rule::minimal_rules;
use crate::types::{Finding, Severity};

/// Outcome of the header checks. Never fatal. `ok` and `errors` reflect the
/// minimal tier; `findings` also carries strict-tier warnings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
    #[serde(skip)]
    pub findings: Vec<Finding>,
}

pub fn validate_minimal(header: &RecipeHeader) -> ValidationReport {
    let findings: Vec<Finding> = minimal_rules().iter().flat_map(|r| r.eval(header)).collect();
    let errors: Vec<String> = findings
        .iter()
        .filter(|f| f.severity == Severity::Fail)
        .map(|f| f.message.clone())
        .collect();
    ValidationReport { ok: errors.is_empty(), errors, findings }
}
