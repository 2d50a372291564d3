// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Orchestrates one reconstruction end to end:
//
//   Step 1: Resolve the device           (Layer 3 - domain)
//   Step 2: Pick the backend             NdArray on host, Wgpu on GPU
//   Step 3: Rebuild the architecture     (Layer 6 - infra)
//   Step 4: Read the input image         (Layer 6 - infra)
//   Step 5: Evaluate                     (Layer 5 - ml)
//   Step 6: Write the reconstruction     (Layer 6 - infra)
//
// Reference: Rust Book §10 (Generic Types)

use anyhow::{bail, Result};
use burn::backend::{NdArray, Wgpu};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{
    device::{DeviceSelector, Placement},
    report::ReconstructionReport,
    traits::DeviceOracle,
};
use crate::infra::{
    checkpoint::{load_config_file, CheckpointManager},
    device_oracle::{FixedOracle, WgpuOracle},
    image_store::ImageStore,
};
use crate::ml::{
    evaluator::Evaluator,
    image_tensor::{from_tensor, to_tensor},
    model::Autoencoder,
    placement::TargetDevice,
};

// ─── Evaluation Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateConfig {
    /// Checkpoint file (.mpk, or .pt/.pth with a model_state_dict entry)
    pub checkpoint:   String,
    /// Architecture JSON; defaults to model_config.json beside the checkpoint
    pub model_config: Option<String>,
    /// Input image (.json or MNIST IDX file)
    pub image:        String,
    /// Which image of an IDX file to use
    pub index:        usize,
    /// Accelerator index, -1 for none
    pub device:       i64,
    /// Where to write the reconstruction as JSON
    pub output:       Option<String>,
}

pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ReconstructionReport> {
        let selector = DeviceSelector::from_index(self.config.device);

        // Only query hardware when an accelerator was actually asked for.
        let oracle: Box<dyn DeviceOracle> = if selector.is_host() {
            Box::new(FixedOracle::none())
        } else {
            Box::new(WgpuOracle::detect())
        };

        match Placement::resolve(selector, oracle.as_ref()) {
            Placement::Host => self.run::<NdArray>(selector, oracle),
            Placement::Accelerator(_) => self.run::<Wgpu>(selector, oracle),
        }
    }

    fn run<B: TargetDevice>(
        &self,
        selector: DeviceSelector,
        oracle:   Box<dyn DeviceOracle>,
    ) -> Result<ReconstructionReport> {
        let cfg = &self.config;
        let checkpoint = Path::new(&cfg.checkpoint);

        let model_cfg = match &cfg.model_config {
            Some(path) => load_config_file(Path::new(path))?,
            None => CheckpointManager::beside(checkpoint).load_config_or_default()?,
        };

        let sample = ImageStore::read(Path::new(&cfg.image), cfg.index)?;
        let expected = [model_cfg.channels, model_cfg.height, model_cfg.width];
        if sample.dims() != expected {
            bail!(
                "Image is {:?} but the model expects {:?}",
                sample.dims(),
                expected,
            );
        }

        let mut evaluator = Evaluator::<B, Autoencoder<B>>::new(selector, oracle);
        evaluator.set_loss();
        let model = model_cfg.init::<B>(evaluator.device());
        evaluator.set_model(model);
        evaluator.load_checkpoint(checkpoint)?;

        let image = to_tensor::<B>(&sample, evaluator.device());
        let result = evaluator.reconstruct_one_image(image)?;

        if let Some(output) = &cfg.output {
            let reconstructed = from_tensor(result.output)?;
            ImageStore::write_json(Path::new(output), &reconstructed)?;
            tracing::info!("Reconstruction written to '{}'", output);
        }

        Ok(ReconstructionReport {
            device:      evaluator.device_name(),
            checkpoint:  cfg.checkpoint.clone(),
            image:       cfg.image.clone(),
            loss:        result.loss,
            elapsed_ms:  result.elapsed_ms,
            output_path: cfg.output.clone(),
        })
    }
}
