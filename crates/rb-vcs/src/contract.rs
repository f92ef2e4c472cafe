use std::path::Path;

use anyhow::Result;

use crate::git::GitShaSource;

/// Initialize a minimal git repo fixture with one commit.
pub fn init_git_repo(dir: &Path) -> Result<()> {
    GitShaSource::run(dir, &["git", "init"])?;
    GitShaSource::run(dir, &["git", "config", "user.email", "bench@example.com"])?;
    GitShaSource::run(dir, &["git", "config", "user.name", "bench"])?;
    GitShaSource::run(dir, &["git", "config", "commit.gpgsign", "false"])?;
    std::fs::write(dir.join("README.md"), "fixture")?;
    GitShaSource::run(dir, &["git", "add", "."])?;
    GitShaSource::run(dir, &["git", "commit", "-m", "init"])?;
    Ok(())
}
