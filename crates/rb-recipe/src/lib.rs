//! Recipe header resolution.
//!
//! A recipe declares its configuration either in `<let name="...">` blocks
//! (`.poml`) or in a `---` delimited YAML frontmatter block (`.md`). Both
//! resolve to the same [`rb_core::RecipeHeader`].

pub mod format;
pub mod frontmatter;
pub mod lets;

pub use format::*;
pub use frontmatter::parse_frontmatter;
pub use lets::parse_let_blocks;
