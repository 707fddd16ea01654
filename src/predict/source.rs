use std::path::{Path, PathBuf};

use log::debug;

use super::artifact::{LoadedModel, Model, ModelArtifact};
use crate::error::{Result, ScoreError};

/// Where models come from. Each call returns a freshly loaded model.
pub trait ModelSource {
    fn load(&self, name: &str) -> Result<Box<dyn Model>>;
}

/// Loads `<dir>/<name>.json` artifacts.
#[derive(Debug, Clone)]
pub struct DirectoryModelSource {
    dir: PathBuf,
}

impl DirectoryModelSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectoryModelSource { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl ModelSource for DirectoryModelSource {
    fn load(&self, name: &str) -> Result<Box<dyn Model>> {
        let path = self.artifact_path(name);
        let load_err = |reason: String| ScoreError::ModelLoad {
            model: name.to_string(),
            reason,
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|e| load_err(format!("reading {}: {e}", path.display())))?;
        let artifact: ModelArtifact = serde_json::from_str(&text)
            .map_err(|e| load_err(format!("parsing {}: {e}", path.display())))?;

        debug!("loaded model '{name}' from {}", path.display());
        Ok(Box::new(LoadedModel::new(name, artifact)?))
    }
}
