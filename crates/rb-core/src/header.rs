use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{Topology, ToolMode};

/// Normalized recipe configuration.
///
/// Values are kept in their parsed structured form so that shape problems
/// (for example `tools` given as a string in a frontmatter block) stay visible
/// to validation. Absent keys are never inserted as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeHeader {
    fields: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl RecipeHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        let fields = fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Insert a value; `null` is treated as absence.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if value.is_null() {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, value);
        }
    }

    pub fn as_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn topology(&self) -> Option<Topology> {
        self.get_str("topology").and_then(Topology::parse)
    }

    pub fn bench_id(&self) -> Option<&str> {
        self.get_str("bench_id").filter(|s| !s.trim().is_empty())
    }

    pub fn tools(&self) -> Option<Vec<String>> {
        let arr = self.fields.get("tools")?.as_array()?;
        Some(arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
    }

    pub fn roles(&self) -> Option<Vec<Role>> {
        serde_json::from_value(self.fields.get("roles")?.clone()).ok()
    }

    pub fn tool_aliases(&self) -> Option<BTreeMap<String, String>> {
        serde_json::from_value(self.fields.get("tool_aliases")?.clone()).ok()
    }

    pub fn tool_mode(&self) -> ToolMode {
        ToolMode::parse(self.get_str("tool_mode"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_values_are_never_stored() {
        let mut h = RecipeHeader::new();
        h.insert("bench_id", Value::Null);
        assert!(h.is_empty());

        let map = json!({"bench_id": "b", "tools": null}).as_object().cloned().unwrap();
        let h = RecipeHeader::from_map(map);
        assert!(h.contains_key("bench_id"));
        assert!(!h.contains_key("tools"));
    }

    #[test]
    fn typed_accessors_ignore_ill_shaped_values() {
        let map = json!({
            "topology": "multi",
            "tools": "fs.read, fs.write",
            "roles": [{"name": "openai", "provider": "openai", "model": "gpt-5"}],
            "tool_mode": "required",
        })
        .as_object()
        .cloned()
        .unwrap();
        let h = RecipeHeader::from_map(map);
        assert_eq!(h.topology(), Some(Topology::Multi));
        assert_eq!(h.tools(), None);
        assert_eq!(h.roles().unwrap()[0].model.as_deref(), Some("gpt-5"));
        assert_eq!(h.tool_mode(), ToolMode::Required);
    }
}
