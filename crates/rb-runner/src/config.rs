use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional `bench.toml` at the repository root. Every field has a default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bench: BenchConfig,
    pub lock: LockConfig,
    pub schema: SchemaConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub root: String,
    pub preview_chars: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    pub path: String,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub path: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self { root: "bench".to_string(), preview_chars: 200 }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self { path: "recipes.lock.json".to_string(), version: "0.1.0".to_string() }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self { path: "schema/recipe.schema.yaml".to_string() }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| "parse bench.toml")?;
        Ok(cfg)
    }

    pub fn load_or_default(repo_root: &Path) -> Result<Self> {
        let path = Self::config_path(repo_root);
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path(repo_root: &Path) -> PathBuf {
        repo_root.join("bench.toml")
    }

    pub fn bench_root(&self, repo_root: &Path) -> PathBuf {
        resolve(repo_root, &self.bench.root)
    }

    pub fn lock_path(&self, repo_root: &Path) -> PathBuf {
        resolve(repo_root, &self.lock.path)
    }

    pub fn schema_path(&self, repo_root: &Path) -> PathBuf {
        resolve(repo_root, &self.schema.path)
    }
}

fn resolve(repo_root: &Path, p: &str) -> PathBuf {
    let expanded = shellexpand::tilde(p).to_string();
    repo_root.join(expanded)
}
