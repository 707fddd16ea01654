//! Run configuration: where the models live, how IDs are derived, and which
//! models each mode averages.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::identifier::IdRule;
use crate::error::{Result, ScoreError};
use crate::predict::{DirectoryModelSource, ModelRegistry};

/// Default directory holding `<model>.json` artifacts.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Settings shared by the pipeline entry points.
///
/// Every field has a default, so a JSON file only needs the keys it
/// changes:
///
/// ```json
/// { "model_dir": "/opt/scoring/models", "id_rule": "portable" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model_dir: PathBuf,
    pub id_rule: IdRule,
    pub registry: ModelRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            id_rule: IdRule::default(),
            registry: ModelRegistry::default(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Modes missing from its `registry` keep
    /// their default ensembles.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ScoreError::io(path, e))?;
        Config::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: Config =
            serde_json::from_str(text).map_err(|e| ScoreError::Config(e.to_string()))?;
        config.registry = config.registry.merged_with_defaults();
        Ok(config)
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    pub fn with_id_rule(mut self, rule: IdRule) -> Self {
        self.id_rule = rule;
        self
    }

    pub fn model_source(&self) -> DirectoryModelSource {
        DirectoryModelSource::new(&self.model_dir)
    }
}
