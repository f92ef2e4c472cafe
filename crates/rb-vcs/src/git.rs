use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

use crate::types::ReleaseShaSource;

/// Reads `HEAD` of the git repository containing `repo_root`.
#[derive(Clone, Debug)]
pub struct GitShaSource {
    pub repo_root: PathBuf,
}

impl GitShaSource {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self { repo_root: repo_root.into() }
    }

    pub(crate) fn run(repo: &Path, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(args[0]);
        cmd.args(&args[1..]).current_dir(repo);
        let out = cmd.output().with_context(|| format!("run {:?}", args))?;
        if !out.status.success() {
            return Err(anyhow!(
                "command failed: {:?}\nstdout:{}\nstderr:{}",
                args,
                String::from_utf8_lossy(&out.stdout),
                String::from_utf8_lossy(&out.stderr)
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    pub fn head_rev(&self) -> Result<String> {
        Self::run(&self.repo_root, &["git", "rev-parse", "HEAD"])
    }
}

impl ReleaseShaSource for GitShaSource {
    fn release_sha(&self) -> Option<String> {
        match self.head_rev() {
            Ok(sha) if !sha.is_empty() => Some(sha),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("git sha unavailable: {e:#}");
                None
            }
        }
    }
}
