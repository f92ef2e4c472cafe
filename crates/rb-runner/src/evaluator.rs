use std::time::Instant;

use rb_core::{BenchCase, CaseResult, Checks, ContainsCheck};
use serde_json::Value;

use crate::invoke::Invoker;

/// Text handed to the invoker: strings pass through, anything else is compact JSON.
pub fn input_text(input: &Value) -> String {
    match input {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Every expected substring must occur in the response, ignoring case.
pub fn contains_all(response: &str, expected: &[String]) -> bool {
    let haystack = response.to_lowercase();
    expected.iter().all(|needle| haystack.contains(&needle.to_lowercase()))
}

pub fn evaluate_case(case: &BenchCase, invoker: &dyn Invoker, preview_chars: usize) -> CaseResult {
    let text = input_text(&case.input);

    let start = Instant::now();
    let response = invoker.invoke(&text);
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    let expected = case.expected.contains.clone();
    let ok = contains_all(&response, &expected);

    CaseResult {
        id: case.id.clone(),
        passed: ok,
        latency_ms,
        tool_calls: 0,
        checks: Checks { contains: ContainsCheck { expected, ok } },
        response_preview: response.chars().take(preview_chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::EchoInvoker;
    use serde_json::json;

    fn case(v: Value) -> BenchCase {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn echo_passes_when_substring_present() {
        let c = case(json!({"id": "c1", "input": "hello world", "expected": {"contains": ["world"]}}));
        let r = evaluate_case(&c, &EchoInvoker, 200);
        assert!(r.passed);
        assert!(r.checks.contains.ok);
        assert_eq!(r.tool_calls, 0);
        assert!(r.latency_ms >= 0.0);
        assert_eq!(r.response_preview, "hello world");
    }

    #[test]
    fn echo_fails_when_substring_absent() {
        let c = case(json!({"id": "c2", "input": "foo", "expected": {"contains": ["bar"]}}));
        let r = evaluate_case(&c, &EchoInvoker, 200);
        assert!(!r.passed);
        assert_eq!(r.checks.contains.expected, vec!["bar".to_string()]);
    }

    #[test]
    fn comparison_ignores_case_and_empty_list_passes() {
        assert!(contains_all("Hello WORLD", &["world".into(), "HELLO".into()]));
        assert!(contains_all("anything", &[]));
    }

    #[test]
    fn structured_input_is_compact_json() {
        assert_eq!(input_text(&json!({"q": "hi", "n": 1})), r#"{"q":"hi","n":1}"#);
        assert_eq!(input_text(&json!(42)), "42");
        let c = case(json!({"id": "c3", "input": {"task": "Refactor"}, "expected": {"contains": ["refactor"]}}));
        assert!(evaluate_case(&c, &EchoInvoker, 200).passed);
    }

    #[test]
    fn preview_is_truncated_by_characters() {
        let c = case(json!({"id": "c4", "input": "ééééé"}));
        assert_eq!(evaluate_case(&c, &EchoInvoker, 3).response_preview, "ééé");
    }
}
