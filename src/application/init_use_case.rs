// ============================================================
// Layer 2 — InitUseCase
// ============================================================
// Writes a freshly initialised autoencoder checkpoint together
// with its model_config.json. Useful for smoke-testing the
// evaluation pipeline on a machine without trained weights.

use anyhow::Result;
use burn::backend::NdArray;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Autoencoder, AutoencoderConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    pub checkpoint_dir: String,
    pub channels:       usize,
    pub height:         usize,
    pub width:          usize,
    pub hidden:         usize,
    pub latent:         usize,
    pub dropout:        f64,
}

impl From<&InitConfig> for AutoencoderConfig {
    fn from(c: &InitConfig) -> Self {
        AutoencoderConfig::new()
            .with_channels(c.channels)
            .with_height(c.height)
            .with_width(c.width)
            .with_hidden(c.hidden)
            .with_latent(c.latent)
            .with_dropout(c.dropout)
    }
}

pub struct InitUseCase {
    config: InitConfig,
}

impl InitUseCase {
    pub fn new(config: InitConfig) -> Self {
        Self { config }
    }

    /// Returns the path of the written weights file.
    pub fn execute(&self) -> Result<PathBuf> {
        let model_cfg = AutoencoderConfig::from(&self.config);
        let manager = CheckpointManager::new(&self.config.checkpoint_dir);
        manager.save_config(&model_cfg)?;

        let device = Default::default();
        let model: Autoencoder<NdArray> = model_cfg.init(&device);
        let path = CheckpointManager::save_model::<NdArray, _>(&model, &manager.model_path())?;

        tracing::info!(
            "Initialised {}-pixel autoencoder in '{}'",
            model_cfg.pixels(),
            manager.dir().display(),
        );
        Ok(path)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returned_checkpoint_exists() {
        let dir = tempfile::tempdir().unwrap();
        let init = InitUseCase::new(InitConfig {
            checkpoint_dir: dir.path().to_string_lossy().into_owned(),
            channels: 1,
            height:   2,
            width:    2,
            hidden:   3,
            latent:   2,
            dropout:  0.0,
        });

        let path = init.execute().unwrap();

        assert!(path.exists(), "'{}' was not written", path.display());
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("model.mpk"));
        assert!(dir.path().join("model_config.json").exists());
    }
}
