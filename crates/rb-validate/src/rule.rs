use rb_core::{Provider, RecipeHeader};
use serde_json::Value;

use crate::types::{Finding, Severity, ValidationCategory};

pub const REQUIRED_KEYS: [&str; 4] = ["topology", "roles", "tools", "bench_id"];
const ROLE_FIELDS: [&str; 3] = ["name", "provider", "model"];

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn category(&self) -> ValidationCategory;
    fn eval(&self, header: &RecipeHeader) -> Vec<Finding>;

    fn fail(&self, message: String) -> Finding {
        Finding {
            rule_id: self.id().to_string(),
            category: self.category(),
            severity: Severity::Fail,
            message,
        }
    }
}

/// Every required key must be present.
pub struct RequiredKeysRule;

impl Rule for RequiredKeysRule {
    fn id(&self) -> &str {
        "required_keys"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Structural
    }

    fn eval(&self, header: &RecipeHeader) -> Vec<Finding> {
        REQUIRED_KEYS
            .iter()
            .filter(|k| !header.contains_key(k))
            .map(|k| self.fail(format!("header.{k}: missing")))
            .collect()
    }
}

/// `roles` and `tools`, when present, must be sequences.
pub struct SequenceShapeRule;

impl Rule for SequenceShapeRule {
    fn id(&self) -> &str {
        "sequence_shape"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Shape
    }

    fn eval(&self, header: &RecipeHeader) -> Vec<Finding> {
        ["roles", "tools"]
            .iter()
            .filter(|k| header.get(k).is_some_and(|v| !v.is_array()))
            .map(|k| self.fail(format!("header.{k}: must be an array")))
            .collect()
    }
}

/// Each role names itself, its provider and its model; the provider is from the closed set.
pub struct RoleEntriesRule;

impl Rule for RoleEntriesRule {
    fn id(&self) -> &str {
        "role_entries"
    }

    fn category(&self) -> ValidationCategory {
        ValidationCategory::Policy
    }

    fn eval(&self, header: &RecipeHeader) -> Vec<Finding> {
        let Some(Value::Array(roles)) = header.get("roles") else {
            return vec![];
        };
        let allowed = Provider::ALL.map(|p| format!("'{}'", p.as_str())).join(",");

        let mut findings = Vec::new();
        for (idx, role) in roles.iter().enumerate() {
            let Some(entry) = role.as_object() else {
                findings.push(self.fail(format!("header.roles[{idx}]: must be an object")));
                continue;
            };
            for field in ROLE_FIELDS {
                if !entry.contains_key(field) {
                    findings.push(self.fail(format!("header.roles[{idx}].{field}: missing")));
                }
            }
            let known = entry.get("provider").and_then(Value::as_str).and_then(Provider::parse);
            if known.is_none() {
                findings.push(self.fail(format!("header.roles[{idx}].provider: must be one of [{allowed}]")));
            }
        }
        findings
    }
}

pub fn minimal_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(RequiredKeysRule), Box::new(SequenceShapeRule), Box::new(RoleEntriesRule)]
}
