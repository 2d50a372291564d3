// ============================================================
// Layer 6 — Device Oracles
// ============================================================
// Implementations of DeviceOracle.
//
//   WgpuOracle  — asks wgpu which adapters exist and keeps the
//                 discrete GPUs of the graphics API Burn runs on,
//                 in the same order WgpuDevice::DiscreteGpu(index)
//                 counts them. wgpu lists one physical GPU once per
//                 API (Vulkan, GL, ...), Burn only ever uses one.
//   FixedOracle — a fixed list of names; used when no
//                 accelerator was requested and in tests.

use crate::domain::traits::DeviceOracle;

/// Graphics API Burn's default wgpu runtime selects on this platform.
pub fn burn_graphics_backend() -> wgpu::Backend {
    if cfg!(any(target_os = "macos", target_os = "ios")) {
        wgpu::Backend::Metal
    } else {
        wgpu::Backend::Vulkan
    }
}

/// Names of the discrete adapters on `backend`, in enumeration order.
pub fn discrete_adapter_names(adapters: &[wgpu::AdapterInfo], backend: wgpu::Backend) -> Vec<String> {
    adapters
        .iter()
        .filter(|info| info.backend == backend)
        .filter(|info| info.device_type == wgpu::DeviceType::DiscreteGpu)
        .map(|info| info.name.clone())
        .collect()
}

/// Accelerators found by enumerating wgpu adapters.
#[derive(Debug, Clone)]
pub struct WgpuOracle {
    names: Vec<String>,
}

impl WgpuOracle {
    /// Enumerate adapters once; the result is cached for the process.
    pub fn detect() -> Self {
        let backend = burn_graphics_backend();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapters: Vec<wgpu::AdapterInfo> = instance
            .enumerate_adapters(wgpu::Backends::all())
            .into_iter()
            .map(|adapter| adapter.get_info())
            .collect();
        let names = discrete_adapter_names(&adapters, backend);

        tracing::debug!(
            "wgpu reported {} adapter(s), {} discrete on {:?}: {:?}",
            adapters.len(),
            names.len(),
            backend,
            names,
        );
        Self { names }
    }
}

impl DeviceOracle for WgpuOracle {
    fn device_count(&self) -> usize {
        self.names.len()
    }

    fn device_name(&self, index: usize) -> Option<String> {
        self.names.get(index).cloned()
    }
}

/// A fixed set of accelerator names.
#[derive(Debug, Clone, Default)]
pub struct FixedOracle {
    names: Vec<String>,
}

impl FixedOracle {
    #[cfg(test)]
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// No accelerators at all.
    pub fn none() -> Self {
        Self::default()
    }
}

impl DeviceOracle for FixedOracle {
    fn device_count(&self) -> usize {
        self.names.len()
    }

    fn device_name(&self, index: usize) -> Option<String> {
        self.names.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_oracle_reports_names() {
        let oracle = FixedOracle::new(vec!["A".to_string(), "B".to_string()]);
        assert!(oracle.is_available());
        assert_eq!(oracle.device_count(), 2);
        assert_eq!(oracle.device_name(1).as_deref(), Some("B"));
        assert_eq!(oracle.device_name(2), None);
    }

    fn adapter(name: &str, device: u32, device_type: wgpu::DeviceType, backend: wgpu::Backend) -> wgpu::AdapterInfo {
        wgpu::AdapterInfo {
            name: name.to_string(),
            vendor: 0x10de,
            device,
            device_type,
            driver: String::new(),
            driver_info: String::new(),
            backend,
        }
    }

    #[test]
    fn test_gpu_listed_per_api_counts_once() {
        use wgpu::{Backend, DeviceType};

        let adapters = vec![
            adapter("GPU A", 1, DeviceType::DiscreteGpu, Backend::Vulkan),
            adapter("GPU A", 1, DeviceType::DiscreteGpu, Backend::Gl),
            adapter("iGPU", 9, DeviceType::IntegratedGpu, Backend::Vulkan),
            adapter("GPU B", 2, DeviceType::DiscreteGpu, Backend::Gl),
            adapter("GPU B", 2, DeviceType::DiscreteGpu, Backend::Vulkan),
        ];

        let names = discrete_adapter_names(&adapters, Backend::Vulkan);
        assert_eq!(names, vec!["GPU A".to_string(), "GPU B".to_string()]);

        // Index 1 is the second discrete GPU on the chosen API.
        let oracle = WgpuOracle { names };
        assert_eq!(oracle.device_count(), 2);
        assert_eq!(oracle.device_name(1).as_deref(), Some("GPU B"));
    }

    #[test]
    fn test_identical_gpus_are_both_counted() {
        use wgpu::{Backend, DeviceType};

        let adapters = vec![
            adapter("GPU A", 1, DeviceType::DiscreteGpu, Backend::Vulkan),
            adapter("GPU A", 1, DeviceType::DiscreteGpu, Backend::Vulkan),
        ];
        assert_eq!(discrete_adapter_names(&adapters, Backend::Vulkan).len(), 2);
    }

    #[test]
    fn test_empty_oracle_is_unavailable() {
        assert!(!FixedOracle::none().is_available());
    }
}
