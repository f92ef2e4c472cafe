use std::path::{Path, PathBuf};

use rb_core::RecipeHeader;
use thiserror::Error;

use crate::types::Finding;

pub const POML_SKIP_NOTE: &str = "schema: skipping strict validation for POML input (YAML schema applies to .md only)";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema: unreadable schema document {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
    #[error("schema: invalid schema document {path}: {reason}")]
    InvalidSchema { path: PathBuf, reason: String },
    #[error("schema: validation error: {0}")]
    Violations(String),
}

/// Whether strict schema validation can run in this build and workspace.
pub enum SchemaCapability {
    Unavailable(String),
    Available(SchemaValidator),
}

impl SchemaCapability {
    /// Probe both capabilities: the schema validator compiled into this build and
    /// a readable YAML schema document at `schema_path`.
    pub fn probe(schema_path: &Path) -> Self {
        if !cfg!(feature = "strict-schema") {
            return SchemaCapability::Unavailable(
                "schema: strict validation not compiled in, skipping strict validation".to_string(),
            );
        }
        if !schema_path.is_file() {
            return SchemaCapability::Unavailable(format!("schema: not found at {}, skipping", schema_path.display()));
        }
        match SchemaValidator::load(schema_path) {
            Ok(v) => SchemaCapability::Available(v),
            Err(e) => SchemaCapability::Unavailable(e.to_string()),
        }
    }
}

pub struct SchemaValidator {
    #[cfg(feature = "strict-schema")]
    compiled: jsonschema::JSONSchema,
}

impl SchemaValidator {
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|e| SchemaError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let schema: serde_json::Value = serde_yaml::from_str(&text).map_err(|e| SchemaError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::compile(path, &schema)
    }

    #[cfg(feature = "strict-schema")]
    fn compile(path: &Path, schema: &serde_json::Value) -> Result<Self, SchemaError> {
        let compiled = jsonschema::JSONSchema::compile(schema).map_err(|e| SchemaError::InvalidSchema {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { compiled })
    }

    #[cfg(not(feature = "strict-schema"))]
    fn compile(path: &Path, _schema: &serde_json::Value) -> Result<Self, SchemaError> {
        Err(SchemaError::InvalidSchema {
            path: path.to_path_buf(),
            reason: "strict validation not compiled in".to_string(),
        })
    }

    #[cfg(feature = "strict-schema")]
    pub fn validate(&self, header: &RecipeHeader) -> Result<(), SchemaError> {
        let instance = header.as_json();
        let violations: Vec<String> = match self.compiled.validate(&instance) {
            Ok(()) => return Ok(()),
            Err(errors) => errors.map(|e| format!("{} at '{}'", e, e.instance_path)).collect(),
        };
        Err(SchemaError::Violations(violations.join("; ")))
    }

    #[cfg(not(feature = "strict-schema"))]
    pub fn validate(&self, _header: &RecipeHeader) -> Result<(), SchemaError> {
        Ok(())
    }
}

/// Run the strict tier if it is available. Returns a warning finding when it is
/// skipped or when the header does not conform.
pub fn strict_finding(schema_path: &Path, header: &RecipeHeader) -> Option<Finding> {
    let note = match SchemaCapability::probe(schema_path) {
        SchemaCapability::Unavailable(note) => Some(note),
        SchemaCapability::Available(validator) => validator.validate(header).err().map(|e| e.to_string()),
    };
    note.map(Finding::schema_warning)
}
