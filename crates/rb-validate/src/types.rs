use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidationCategory {
    Structural,
    Shape,
    Policy,
    Schema,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Fail,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub category: ValidationCategory,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    /// Advisory note from the strict tier.
    pub fn schema_warning(message: impl Into<String>) -> Self {
        Finding {
            rule_id: "strict_schema".to_string(),
            category: ValidationCategory::Schema,
            severity: Severity::Warn,
            message: message.into(),
        }
    }
}
