use std::path::{Path, PathBuf};

use hf_hub::api::sync::Api;
use tracing::info;

use crate::error::{Result, ServerError};

/// Locations of the three artifacts a checkpoint provides: config, tokenizer
/// and safetensor weights.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelPaths {
    /// Use a local snapshot folder with the same layout as a hub download.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let paths = Self {
            config: dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
            weights: dir.join("model.safetensors"),
        };
        for path in [&paths.config, &paths.tokenizer, &paths.weights] {
            if !path.exists() {
                return Err(ServerError::ModelLoad(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }
        Ok(paths)
    }

    /// Download the artifacts from the hub, reusing the local cache when the
    /// files are already present.
    pub fn fetch(model_id: &str) -> Result<Self> {
        info!("Fetching model artifacts for {}", model_id);
        let repo = Api::new()?.model(model_id.to_string());
        Ok(Self {
            config: repo.get("config.json")?,
            tokenizer: repo.get("tokenizer.json")?,
            weights: repo.get("model.safetensors")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dir_rejects_a_folder_without_artifacts() {
        let result = ModelPaths::from_dir(Path::new("/nonexistent/snapshot"));
        let err = result.err().expect("expected missing files to error");
        assert!(err.to_string().contains("config.json"));
    }
}
