// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Restores model weights from disk, and writes them for the
// `init` command.
//
// Two checkpoint formats are understood:
//
//   1. Burn's CompactRecorder (.mpk)
//      - model parameters as half-precision MessagePack
//      - type-safe: loading fails if the architecture differs
//
//   2. PyTorch pickles (.pt / .pth)
//      - a dict whose "model_state_dict" entry maps parameter
//        names to tensors, as written by torch.save()
//      - every key must match a parameter of the model
//
// The model architecture is stored next to the weights as
// model_config.json, so the model can be rebuilt before its
// parameters are loaded:
//
//   checkpoints/
//     model.mpk           ← weights
//     model_config.json   ← AutoencoderConfig
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};
use burn_store::{ModuleSnapshot, PytorchStore};

use crate::ml::model::AutoencoderConfig;

/// Entry of a PyTorch checkpoint dict holding the parameters.
pub const STATE_DICT_KEY: &str = "model_state_dict";

const CONFIG_FILE: &str = "model_config.json";
const COMPACT_SUFFIXES: [&str; 2] = [".mpk.gz", ".mpk"];

/// On-disk layout of a checkpoint, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointFormat {
    Compact,
    PyTorch,
}

impl CheckpointFormat {
    pub fn detect(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("pt") | Some("pth") => Self::PyTorch,
            _ => Self::Compact,
        }
    }
}

/// Manages a checkpoint directory and the files inside it.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Manager for the directory a checkpoint file lives in.
    pub fn beside(checkpoint: &Path) -> Self {
        let dir = checkpoint
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the native weights file, without the recorder's extension.
    pub fn model_path(&self) -> PathBuf {
        self.dir.join("model")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Save the model architecture to JSON.
    pub fn save_config(&self, cfg: &AutoencoderConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        let path = self.config_path();

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    /// Load the model architecture from JSON.
    pub fn load_config(&self) -> Result<AutoencoderConfig> {
        load_config_file(&self.config_path())
    }

    /// Load the architecture if the directory has one, else the default.
    pub fn load_config_or_default(&self) -> Result<AutoencoderConfig> {
        if self.config_path().exists() {
            self.load_config()
        } else {
            tracing::info!(
                "No {} in '{}', using the default architecture",
                CONFIG_FILE,
                self.dir.display(),
            );
            Ok(AutoencoderConfig::new())
        }
    }

    /// Save model weights with the CompactRecorder.
    ///
    /// Returns the path of the file actually written, with the
    /// recorder's own extension.
    pub fn save_model<B: Backend, M: Module<B>>(model: &M, path: &Path) -> Result<PathBuf> {
        let base = compact_base(path);
        if let Some(parent) = base.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        Recorder::<B>::record(&CompactRecorder::new(), model.clone().into_record(), base.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", base.display()))?;

        let written = base.with_extension(<CompactRecorder as FileRecorder<B>>::file_extension());
        tracing::debug!("Saved checkpoint to '{}'", written.display());
        Ok(written)
    }

    /// Load the parameters stored at `path` into `model`.
    ///
    /// The model must have the architecture the checkpoint was written
    /// with, otherwise loading fails.
    pub fn load_into<B: Backend, M: Module<B>>(
        model:  M,
        path:   &Path,
        device: &B::Device,
    ) -> Result<M> {
        match CheckpointFormat::detect(path) {
            CheckpointFormat::Compact => {
                let base = compact_base(path);
                tracing::info!("Loading checkpoint '{}'", path.display());

                let record: M::Record = Recorder::<B>::load(&CompactRecorder::new(), base.clone(), device)
                    .with_context(|| {
                        format!("Cannot load checkpoint '{}'", base.display())
                    })?;

                Ok(model.load_record(record))
            }
            CheckpointFormat::PyTorch => {
                tracing::info!(
                    "Loading PyTorch checkpoint '{}' (key '{}')",
                    path.display(),
                    STATE_DICT_KEY,
                );

                let mut model = model;
                let mut store = PytorchStore::from_file(path).with_top_level_key(STATE_DICT_KEY);
                <M as ModuleSnapshot<B>>::load_from(&mut model, &mut store).map_err(|e| {
                    anyhow::anyhow!("Cannot load PyTorch checkpoint '{}': {e:?}", path.display())
                })?;

                Ok(model)
            }
        }
    }
}

/// Read an AutoencoderConfig from a JSON file.
pub fn load_config_file(path: &Path) -> Result<AutoencoderConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid model config in '{}'", path.display()))
}

/// The recorder appends its own extension, so strip one if the user gave it.
fn compact_base(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    for suffix in COMPACT_SUFFIXES {
        if let Some(stripped) = text.strip_suffix(suffix) {
            return PathBuf::from(stripped);
        }
    }
    path.to_path_buf()
}
