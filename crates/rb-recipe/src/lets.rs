use std::sync::OnceLock;

use rb_core::RecipeHeader;
use regex::Regex;
use serde_json::{json, Map, Value};

fn let_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<let\s+name="([^"]+)">([\s\S]*?)</let>"#).expect("let block regex"))
}

/// Collect every `<let name="X">...</let>` block. The last occurrence of a
/// name wins. Bodies are parsed as JSON when possible, else kept as trimmed text.
pub fn parse_let_blocks(text: &str) -> Map<String, Value> {
    let mut lets = Map::new();
    for cap in let_re().captures_iter(text) {
        let name = cap[1].trim().to_string();
        let raw = cap[2].trim();
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        lets.insert(name, value);
    }
    lets
}

pub(crate) fn header_from_lets(text: &str) -> RecipeHeader {
    let lets = parse_let_blocks(text);
    let mut header = RecipeHeader::new();

    for key in ["topology", "bench_id", "tool_mode", "variant"] {
        if let Some(Value::String(s)) = lets.get(key) {
            header.insert(key, Value::String(s.clone()));
        }
    }

    match lets.get("tools") {
        Some(Value::Array(tools)) => header.insert("tools", Value::Array(tools.clone())),
        Some(Value::String(s)) if !s.is_empty() => {
            let tools: Vec<Value> = s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| Value::String(t.to_string()))
                .collect();
            header.insert("tools", Value::Array(tools));
        }
        _ => {}
    }

    if let Some(Value::Object(providers)) = lets.get("providers") {
        let roles: Vec<Value> = providers
            .iter()
            .map(|(provider, cfg)| {
                let mut role = json!({ "name": provider, "provider": provider });
                if let Some(model) = cfg.get("model").filter(|m| !m.is_null()) {
                    role["model"] = model.clone();
                }
                role
            })
            .collect();
        if !roles.is_empty() {
            header.insert("roles", Value::Array(roles));
        }
    }

    if let Some(aliases @ Value::Object(_)) = lets.get("tool_aliases") {
        header.insert("tool_aliases", aliases.clone());
    }
    if let Some(variants @ Value::Array(_)) = lets.get("variants") {
        header.insert("variants", variants.clone());
    }

    header
}
