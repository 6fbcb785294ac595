//! JSON persistence of annotation trees.
use std::path::{Path, PathBuf};

use crate::{
    annotation::ModuleAnnotations,
    magic::{DEFAULT_ANNOTATIONS_FILE, ENV_ANNOTATIONS_PATH, JSON_STRING_SOURCE},
    utils::{AnnotResult, Error},
};

impl ModuleAnnotations {
    /// Get the default path of the persisted annotations.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(path) = std::env::var(ENV_ANNOTATIONS_PATH) {
            return path.into();
        }

        PathBuf::from(DEFAULT_ANNOTATIONS_FILE)
    }

    /// Serialize the tree to a JSON string.
    pub fn to_json(&self) -> AnnotResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Unknown(format!("Failed during serialization of annotations: {}", e)))
    }

    /// Parse a tree from a JSON string.
    pub fn from_json(json: &str) -> AnnotResult<Self> {
        serde_json::from_str(json).map_err(|e| Error::ParseError {
            source: e,
            file: JSON_STRING_SOURCE.to_string(),
        })
    }

    /// Load a tree from a JSON file.
    pub fn load_from_json(path: &Path) -> AnnotResult<Self> {
        let json = std::fs::read_to_string(path)?;

        serde_json::from_str(&json).map_err(|e| Error::ParseError {
            source: e,
            file: path.display().to_string(),
        })
    }

    /// Save the tree to a JSON file.
    pub fn save_to_json(&self, path: &Path) -> AnnotResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            Error::Unknown(format!(
                "Failed during serialization of annotations to path `{}`: {}",
                path.display(),
                e
            ))
        })?;

        // Attempt to create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}
