use std::collections::BTreeMap;

use rb_core::{Provider, ToolMode};
use serde_json::{json, Value};

/// The model call a case is evaluated through.
pub trait Invoker {
    fn invoke(&self, input: &str) -> String;
}

/// Returns its input unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoInvoker;

impl Invoker for EchoInvoker {
    fn invoke(&self, input: &str) -> String {
        input.to_string()
    }
}

/// Provider-specific configuration derived from a recipe. Invocation is still
/// an echo; the mapping helpers describe what a native call would send.
#[derive(Clone, Debug)]
pub struct ProviderAdapter {
    pub provider: Provider,
    pub model: Option<String>,
    pub tool_aliases: BTreeMap<String, String>,
}

impl ProviderAdapter {
    pub fn new(provider: Provider, model: Option<String>, tool_aliases: BTreeMap<String, String>) -> Self {
        Self { provider, model, tool_aliases }
    }

    fn tool_name(&self, tool: &str) -> String {
        self.tool_aliases.get(tool).cloned().unwrap_or_else(|| tool.to_string())
    }

    /// Provider-native tool choice for the recipe's `tool_mode`.
    pub fn tool_choice(&self, mode: ToolMode) -> Value {
        match self.provider {
            Provider::Openai => {
                let ty = match mode {
                    ToolMode::Auto => "auto",
                    ToolMode::Required => "required",
                    ToolMode::None => "none",
                };
                json!({ "type": ty })
            }
            Provider::Gemini => {
                let m = match mode {
                    ToolMode::Auto => "AUTO",
                    ToolMode::Required => "ANY",
                    ToolMode::None => "NONE",
                };
                json!({ "function_calling_config": { "mode": m } })
            }
            Provider::Qwen => {
                let m = match mode {
                    ToolMode::Auto => "auto",
                    ToolMode::Required => "required",
                    ToolMode::None => "none",
                };
                json!({ "mode": m })
            }
        }
    }

    /// Tool declarations with logical names mapped through `tool_aliases`.
    /// Gemini takes a plain list of allowed function names.
    pub fn tool_declarations(&self, tools: &[String]) -> Value {
        match self.provider {
            Provider::Gemini => Value::Array(tools.iter().map(|t| Value::String(self.tool_name(t))).collect()),
            Provider::Openai | Provider::Qwen => Value::Array(
                tools
                    .iter()
                    .map(|t| {
                        json!({
                            "name": self.tool_name(t),
                            "schema": { "type": "object", "properties": {} },
                            "required": [],
                        })
                    })
                    .collect(),
            ),
        }
    }
}

impl Invoker for ProviderAdapter {
    fn invoke(&self, input: &str) -> String {
        input.to_string()
    }
}
