use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Solo,
    Multi,
}

impl Topology {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "solo" => Some(Self::Solo),
            "multi" => Some(Self::Multi),
            _ => None,
        }
    }
}

/// Closed set of model providers a recipe may target.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Openai,
    Gemini,
    Qwen,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Openai, Provider::Gemini, Provider::Qwen];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Openai => "openai",
            Provider::Gemini => "gemini",
            Provider::Qwen => "qwen",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-agnostic tool-calling mode declared by a recipe.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Auto,
    Required,
    None,
}

impl ToolMode {
    /// Unknown or missing modes fall back to `auto`.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("required") => ToolMode::Required,
            Some("none") => ToolMode::None,
            _ => ToolMode::Auto,
        }
    }
}
