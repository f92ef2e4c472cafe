use std::path::Path;

use anyhow::{Context, Result};
use rb_core::RecipeHeader;

use crate::{frontmatter, lets};

/// Recipe document formats, dispatched by filename suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecipeFormat {
    /// `.poml`: repeated `<let name="X">...</let>` blocks.
    TagBased,
    /// `.md`: YAML between two `---` lines at the top of the document.
    DelimitedBlock,
}

impl RecipeFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "poml" => Some(RecipeFormat::TagBased),
            "md" => Some(RecipeFormat::DelimitedBlock),
            _ => None,
        }
    }

    pub fn resolve(&self, text: &str) -> RecipeHeader {
        let text = text.replace("\r\n", "\n");
        match self {
            RecipeFormat::TagBased => lets::header_from_lets(&text),
            RecipeFormat::DelimitedBlock => frontmatter::parse_frontmatter(&text),
        }
    }
}

/// Resolve a recipe document into a header. Never fails: an absent path, an
/// unknown suffix, an unreadable file or a malformed block all yield an empty header.
pub fn resolve_header(path: Option<&Path>) -> RecipeHeader {
    let Some(path) = path else {
        return RecipeHeader::new();
    };
    match try_resolve(path) {
        Ok(header) => header,
        Err(e) => {
            tracing::warn!(recipe = %path.display(), "recipe header unavailable: {e:#}");
            RecipeHeader::new()
        }
    }
}

fn try_resolve(path: &Path) -> Result<RecipeHeader> {
    let Some(format) = RecipeFormat::from_path(path) else {
        tracing::debug!(recipe = %path.display(), "unknown recipe format");
        return Ok(RecipeHeader::new());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("read recipe {}", path.display()))?;
    Ok(format.resolve(&text))
}
