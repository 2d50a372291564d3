// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs one reconstruction through a trained model and reports
// how well and how fast it did.
//
// Call sequence:
//   Evaluator::new(selector, oracle)   → prints the device
//   set_loss()                          → mean squared error
//   set_model(model)                    → moved onto the device
//   load_checkpoint(path)               → weights restored
//   reconstruct_one_image(image)        → (output, loss, ms)
//
// No-gradient mode: B is always a plain inference backend
// (NdArray or Wgpu, never Autodiff<_>), so no graph is recorded
// and Dropout is an identity. On top of that set_model() calls
// no_grad() so the parameters are frozen as well.
//
// Reference: Burn Book §6 (Inference)

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use burn::{
    nn::loss::{MseLoss, Reduction},
    prelude::*,
};

use crate::domain::{
    device::{DeviceSelector, Placement},
    error::EvaluateError,
    traits::DeviceOracle,
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::ImageModel;
use crate::ml::placement::{
    ensure_module_resident, ensure_resident, synchronize, to_host, HostBackend, TargetDevice,
};

/// Result of one reconstruction.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// Reconstructed image on the host, shaped like the input
    pub output:     Tensor<HostBackend, 3>,
    /// Mean squared error between the input and the reconstruction
    pub loss:       f64,
    /// Wall time around the forward pass, device synchronised
    pub elapsed_ms: f64,
}

pub struct Evaluator<B: Backend, M: ImageModel<B>> {
    placement: Placement,
    device:    B::Device,
    oracle:    Box<dyn DeviceOracle>,
    loss:      Option<MseLoss>,
    model:     Option<M>,
}

impl<B, M> Evaluator<B, M>
where
    B: TargetDevice,
    M: ImageModel<B>,
{
    pub fn new(selector: DeviceSelector, oracle: Box<dyn DeviceOracle>) -> Self {
        let placement = Placement::resolve(selector, oracle.as_ref());
        let device = B::target_device(placement);
        let evaluator = Self { placement, device, oracle, loss: None, model: None };

        println!("Evaluating on {}", evaluator.device_name());
        tracing::debug!("Selector {:?} resolved to {:?}", selector, placement);
        evaluator
    }

    #[cfg(test)]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    pub fn device_name(&self) -> String {
        self.placement.describe(self.oracle.as_ref())
    }

    pub fn set_loss(&mut self) {
        self.loss = Some(MseLoss::new());
    }

    pub fn set_model(&mut self, model: M) {
        let model = self.to_target_module(model).no_grad();
        self.model = Some(model);
    }

    #[cfg(test)]
    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    /// Restore the model's parameters from `filepath`.
    ///
    /// The model must be set first; that is checked before the file is touched.
    pub fn load_checkpoint(&mut self, filepath: impl AsRef<Path>) -> Result<()> {
        let model = self.model.as_ref().ok_or(EvaluateError::ModelNotSet)?.clone();
        let loaded = CheckpointManager::load_into::<B, M>(model, filepath.as_ref(), &self.device)?;
        self.model = Some(loaded.no_grad());
        Ok(())
    }

    /// Reconstruct a single [channels, height, width] image.
    pub fn reconstruct_one_image(&self, img: Tensor<B, 3>) -> Result<Reconstruction> {
        let model = self.model.as_ref().ok_or(EvaluateError::ModelNotSet)?;
        let loss_fn = self.loss.as_ref().ok_or(EvaluateError::LossNotSet)?;

        let start = Instant::now();

        let [channels, height, width] = img.dims();
        let img = self.to_target(img).unsqueeze::<4>();
        let output = model.forward(img.clone());

        // Loss is taken against the device-resident batched input.
        let sample_loss = loss_fn.forward(img, output.clone(), Reduction::Mean);

        // Wait for queued device work before reading the clock.
        synchronize::<B>(&self.device)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        println!("Took {elapsed_ms} ms");

        let loss: f64 = sample_loss.into_scalar().elem::<f64>();
        tracing::debug!("Reconstruction loss={:.6} elapsed={:.3}ms", loss, elapsed_ms);

        let output = self.to_host(output.reshape([channels, height, width]));
        Ok(Reconstruction { output, loss, elapsed_ms })
    }

    /// Ensure a tensor lives on the evaluation device.
    pub fn to_target<const D: usize>(&self, o: Tensor<B, D>) -> Tensor<B, D> {
        ensure_resident(o, &self.device)
    }

    /// Ensure a module lives on the evaluation device.
    pub fn to_target_module(&self, o: M) -> M {
        ensure_module_resident(o, &self.device)
    }

    /// Copy a tensor back onto the host.
    pub fn to_host<const D: usize>(&self, o: Tensor<B, D>) -> Tensor<HostBackend, D> {
        to_host(o)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::domain::device::HOST_DEVICE_NAME;
    use crate::infra::device_oracle::FixedOracle;
    use crate::ml::model::{Autoencoder, AutoencoderConfig};

    type TestBackend = NdArray;
    type TestEvaluator = Evaluator<TestBackend, Autoencoder<TestBackend>>;

    fn small_config() -> AutoencoderConfig {
        AutoencoderConfig::new().with_height(4).with_width(4).with_hidden(8).with_latent(3)
    }

    fn sample_image(device: &<TestBackend as Backend>::Device) -> Tensor<TestBackend, 3> {
        let pixels: Vec<f32> = (0..16).map(|i| i as f32 / 16.0).collect();
        Tensor::<TestBackend, 1>::from_floats(pixels.as_slice(), device).reshape([1, 4, 4])
    }

    fn ready_evaluator() -> TestEvaluator {
        let mut evaluator = TestEvaluator::new(DeviceSelector::Host, Box::new(FixedOracle::none()));
        evaluator.set_loss();
        let model = small_config().init(evaluator.device());
        evaluator.set_model(model);
        evaluator
    }

    fn precondition(err: &anyhow::Error) -> Option<EvaluateError> {
        err.downcast_ref::<EvaluateError>().copied()
    }

    #[test]
    fn test_host_selector_always_reports_cpu() {
        let oracle = FixedOracle::new(vec!["Test GPU".to_string()]);
        let evaluator = TestEvaluator::new(DeviceSelector::from_index(-1), Box::new(oracle));
        assert_eq!(evaluator.device_name(), HOST_DEVICE_NAME);
    }

    #[test]
    fn test_accelerator_without_hardware_reports_cpu() {
        let evaluator = TestEvaluator::new(DeviceSelector::Accelerator(0), Box::new(FixedOracle::none()));
        assert_eq!(evaluator.device_name(), HOST_DEVICE_NAME);
        assert_eq!(evaluator.placement(), Placement::Host);
    }

    #[test]
    fn test_accelerator_with_hardware_reports_name() {
        let oracle = FixedOracle::new(vec!["Test GPU".to_string()]);
        let evaluator = TestEvaluator::new(DeviceSelector::Accelerator(0), Box::new(oracle));
        assert_eq!(evaluator.device_name(), "[0]: Test GPU");
    }

    #[test]
    fn test_reconstruct_without_model_fails() {
        let mut evaluator = TestEvaluator::new(DeviceSelector::Host, Box::new(FixedOracle::none()));
        evaluator.set_loss();
        let image = sample_image(evaluator.device());

        let err = evaluator.reconstruct_one_image(image).unwrap_err();
        assert_eq!(precondition(&err), Some(EvaluateError::ModelNotSet));
    }

    #[test]
    fn test_reconstruct_without_loss_fails() {
        let mut evaluator = TestEvaluator::new(DeviceSelector::Host, Box::new(FixedOracle::none()));
        let model = small_config().init(evaluator.device());
        evaluator.set_model(model);
        let image = sample_image(evaluator.device());

        let err = evaluator.reconstruct_one_image(image).unwrap_err();
        assert_eq!(precondition(&err), Some(EvaluateError::LossNotSet));
    }

    #[test]
    fn test_reconstruction_is_deterministic() {
        let evaluator = ready_evaluator();
        let image = sample_image(evaluator.device());

        let first  = evaluator.reconstruct_one_image(image.clone()).unwrap();
        let second = evaluator.reconstruct_one_image(image).unwrap();

        assert_eq!(first.loss, second.loss);
        first.output.into_data().assert_eq(&second.output.into_data(), true);
        assert!(first.elapsed_ms >= 0.0);
    }

    #[test]
    fn test_output_shape_matches_input() {
        let evaluator = ready_evaluator();
        let image = sample_image(evaluator.device());

        let result = evaluator.reconstruct_one_image(image).unwrap();

        assert_eq!(result.output.dims(), [1, 4, 4]);
        assert!(result.loss.is_finite());
        assert!(result.loss >= 0.0);
    }

    #[test]
    fn test_load_checkpoint_without_model_skips_io() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does_not_exist.mpk.gz");
        let mut evaluator = TestEvaluator::new(DeviceSelector::Host, Box::new(FixedOracle::none()));

        let err = evaluator.load_checkpoint(&missing).unwrap_err();

        assert_eq!(precondition(&err), Some(EvaluateError::ModelNotSet));
        assert!(!missing.exists());
        assert!(evaluator.model().is_none());
    }

    #[test]
    fn test_failed_load_keeps_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut evaluator = ready_evaluator();

        let result = evaluator.load_checkpoint(dir.path().join("missing"));

        assert!(result.is_err());
        assert_eq!(precondition(&result.unwrap_err()), None);
        assert!(evaluator.model().is_some());
    }

    #[test]
    fn test_loaded_checkpoint_reproduces_saved_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");
        let device = Default::default();

        let trained: Autoencoder<TestBackend> = small_config().init(&device);
        CheckpointManager::save_model::<TestBackend, _>(&trained, &path).unwrap();

        let image = sample_image(&device);
        let expected = trained.forward(image.clone().unsqueeze::<4>());

        let mut evaluator = ready_evaluator();
        evaluator.load_checkpoint(&path).unwrap();
        let result = evaluator.reconstruct_one_image(image).unwrap();

        let actual: Vec<f32> = result.output.into_data().to_vec().unwrap();
        let expected: Vec<f32> = expected.into_data().to_vec().unwrap();
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-2, "{a} != {e}");
        }
    }

    #[test]
    fn test_pytorch_checkpoint_loads_through_evaluator() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/autoencoder_state_dict.pt");
        let cfg = AutoencoderConfig::new().with_height(2).with_width(2).with_hidden(4).with_latent(4);
        let mut evaluator = TestEvaluator::new(DeviceSelector::Host, Box::new(FixedOracle::none()));
        evaluator.set_loss();
        let model = cfg.init(evaluator.device());
        evaluator.set_model(model);

        evaluator.load_checkpoint(&path).unwrap();

        let image = Tensor::<TestBackend, 3>::zeros([1, 2, 2], evaluator.device());
        let result = evaluator.reconstruct_one_image(image).unwrap();
        assert_eq!(result.output.dims(), [1, 2, 2]);
        assert!(result.loss.is_finite());
    }

    #[test]
    fn test_pytorch_checkpoint_with_wrong_keys_is_rejected() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/mismatched_state_dict.pt");
        let cfg = AutoencoderConfig::new().with_height(2).with_width(2).with_hidden(4).with_latent(4);
        let mut evaluator = TestEvaluator::new(DeviceSelector::Host, Box::new(FixedOracle::none()));
        let model = cfg.init(evaluator.device());
        evaluator.set_model(model);

        let err = evaluator.load_checkpoint(&path).unwrap_err();
        assert_eq!(precondition(&err), None);
        assert!(evaluator.model().is_some());
    }
}
