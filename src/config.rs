use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::GeneratorOptions;
use crate::error::{BuilderError, BuilderResult};

/// Builder configuration. Every field has a default, so a partial JSON
/// document (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderConfig {
    /// Directory receiving the generated app module.
    pub generated_dir: PathBuf,
    /// Directory receiving one module per registered custom component.
    pub user_components_dir: PathBuf,
    pub app_file_name: String,
    pub generator: GeneratorOptions,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            generated_dir: PathBuf::from("app/src/generated"),
            user_components_dir: PathBuf::from("usercomponents"),
            app_file_name: "GeneratedApp.jsx".to_string(),
            generator: GeneratorOptions::default(),
        }
    }
}

impl BuilderConfig {
    pub fn from_json_str(text: &str) -> BuilderResult<Self> {
        serde_json::from_str(text).map_err(|e| BuilderError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> BuilderResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn app_path(&self) -> PathBuf {
        self.generated_dir.join(&self.app_file_name)
    }

    pub fn user_component_path(&self, node_type: &str) -> PathBuf {
        self.user_components_dir.join(format!("{}.jsx", node_type))
    }
}
