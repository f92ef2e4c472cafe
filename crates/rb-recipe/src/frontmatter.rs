use rb_core::RecipeHeader;
use serde_json::Value;

const DELIMITER: &str = "---";

/// Parse the YAML block (LF line endings) enclosed by the opening `---` line and the next `---` line.
/// Anything else (no opening delimiter, unterminated block, invalid YAML, or a
/// non-mapping document) yields an empty header.
pub fn parse_frontmatter(text: &str) -> RecipeHeader {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.first().map(|l| l.trim()) != Some(DELIMITER) {
        return RecipeHeader::new();
    }
    let Some(end) = lines.iter().skip(1).position(|l| l.trim() == DELIMITER) else {
        return RecipeHeader::new();
    };
    let block = lines[1..end + 1].join("\n");

    match serde_yaml::from_str::<Value>(&block) {
        Ok(Value::Object(map)) => RecipeHeader::from_map(map),
        Ok(_) => RecipeHeader::new(),
        Err(e) => {
            tracing::warn!("recipe frontmatter is not valid YAML: {e}");
            RecipeHeader::new()
        }
    }
}
