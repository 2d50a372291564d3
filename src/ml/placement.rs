// ============================================================
// Layer 5 — Device Placement
// ============================================================
// Two jobs:
//
//   1. Turn a resolved Placement into a concrete Burn device for
//      each backend we ship (TargetDevice).
//
//   2. Move tensors and modules between devices with an
//      idempotent contract: if the value already lives on the
//      target device it is returned untouched, otherwise it is
//      transferred. Calling these twice is the same as once.
//
// Host copies always land on the NdArray backend, which is what
// the rest of the program treats as "the CPU".

use std::fmt::Debug;

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    prelude::*,
};

use crate::domain::device::Placement;

/// Backend the host copies of results live on.
pub type HostBackend = NdArray;

/// Maps a Placement onto a device of this backend.
pub trait TargetDevice: Backend {
    fn target_device(placement: Placement) -> Self::Device;
}

impl TargetDevice for NdArray {
    fn target_device(_placement: Placement) -> NdArrayDevice {
        // NdArray only ever runs on the CPU.
        NdArrayDevice::Cpu
    }
}

impl TargetDevice for Wgpu {
    fn target_device(placement: Placement) -> WgpuDevice {
        match placement {
            Placement::Accelerator(index) => WgpuDevice::DiscreteGpu(index),
            Placement::Host => WgpuDevice::Cpu,
        }
    }
}

/// Ensure `tensor` is resident on `device`; no-op if it already is.
pub fn ensure_resident<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    device: &B::Device,
) -> Tensor<B, D> {
    if tensor.device() == *device {
        tensor
    } else {
        tensor.to_device(device)
    }
}

/// Ensure every parameter of `module` is on `device`; no-op if they already are.
pub fn ensure_module_resident<B: Backend, M: Module<B>>(module: M, device: &B::Device) -> M {
    let devices = module.devices();
    if !devices.is_empty() && devices.iter().all(|d| d == device) {
        module
    } else {
        module.to_device(device)
    }
}

/// Block until all work queued on `device` has finished.
pub fn synchronize<B: Backend>(device: &B::Device) -> Result<()> {
    sync_outcome(B::sync(device))
}

fn sync_outcome<E: Debug>(outcome: std::result::Result<(), E>) -> Result<()> {
    outcome.map_err(|e| anyhow::anyhow!("Device sync failed: {e:?}"))
}

/// Copy `tensor` onto the host backend.
///
/// The data is read back from the device (this blocks until the
/// device has finished producing it) and rebuilt on NdArray.
pub fn to_host<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Tensor<HostBackend, D> {
    Tensor::from_data(tensor.into_data(), &NdArrayDevice::Cpu)
}
