//! Build-time generator options, read from TOML.
//!
//! ```toml
//! runtime_path = "::boxdb"
//! model_fn = "boxdb_model"
//! file_suffix = ".obx.rs"
//! ```

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("generator config '{path}' could not be read: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("generator config is invalid: {0}")]
    Toml(#[from] toml::de::Error),
}

///
/// GeneratorConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Path generated code uses to name the runtime crate.
    pub runtime_path: String,

    /// Name of the generated model registration function.
    pub model_fn: String,

    /// Suffix of per-entity files written by `write_to_dir`.
    pub file_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_path: "::boxdb".to_string(),
            model_fn: "boxdb_model".to_string(),
            file_suffix: ".obx.rs".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&text)
    }
}
