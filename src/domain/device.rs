// ============================================================
// Layer 3 — Device Selection
// ============================================================
// The user picks a device with a plain integer on the command
// line. `-1` means "do not use an accelerator"; a non-negative
// number is the index of the accelerator to run on.
//
// A request is not a guarantee. The selector is resolved into a
// Placement by asking a DeviceOracle what hardware actually
// exists, so asking for accelerator 0 on a machine without one
// quietly falls back to the host.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};

use crate::domain::traits::DeviceOracle;

/// Shown whenever evaluation runs on the host.
pub const HOST_DEVICE_NAME: &str = "CPU (no accelerator found)";

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceSelector {
    /// No accelerator requested (the `-1` sentinel)
    Host,
    /// Accelerator with the given index
    Accelerator(usize),
}

impl DeviceSelector {
    /// Any negative index is treated the same as `-1`.
    pub fn from_index(index: i64) -> Self {
        if index < 0 {
            Self::Host
        } else {
            Self::Accelerator(index as usize)
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self, Self::Host)
    }
}

impl From<i64> for DeviceSelector {
    fn from(index: i64) -> Self {
        Self::from_index(index)
    }
}

/// Where evaluation will actually run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Host,
    Accelerator(usize),
}

impl Placement {
    /// Resolve a selector against the hardware the oracle reports.
    ///
    /// The availability check takes precedence over the request:
    /// an accelerator index is only honoured if the oracle knows it.
    pub fn resolve(selector: DeviceSelector, oracle: &dyn DeviceOracle) -> Self {
        match selector {
            DeviceSelector::Host => Self::Host,
            DeviceSelector::Accelerator(index) => {
                if !oracle.is_available() {
                    tracing::debug!("No accelerator available, falling back to host");
                    Self::Host
                } else if index >= oracle.device_count() {
                    tracing::warn!(
                        "Accelerator {} requested but only {} found, falling back to host",
                        index,
                        oracle.device_count(),
                    );
                    Self::Host
                } else {
                    Self::Accelerator(index)
                }
            }
        }
    }

    /// Human-readable description of this placement.
    pub fn describe(&self, oracle: &dyn DeviceOracle) -> String {
        match self {
            Self::Host => HOST_DEVICE_NAME.to_string(),
            Self::Accelerator(index) => {
                let name = oracle
                    .device_name(*index)
                    .unwrap_or_else(|| "unknown device".to_string());
                format!("[{index}]: {name}")
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::device_oracle::FixedOracle;

    #[test]
    fn test_negative_index_is_host() {
        assert_eq!(DeviceSelector::from_index(-1), DeviceSelector::Host);
        assert_eq!(DeviceSelector::from_index(-7), DeviceSelector::Host);
        assert_eq!(DeviceSelector::from_index(2), DeviceSelector::Accelerator(2));
    }

    #[test]
    fn test_host_selector_ignores_available_accelerators() {
        let oracle = FixedOracle::new(vec!["Test GPU".to_string()]);
        let placement = Placement::resolve(DeviceSelector::Host, &oracle);
        assert_eq!(placement, Placement::Host);
        assert_eq!(placement.describe(&oracle), HOST_DEVICE_NAME);
    }

    #[test]
    fn test_accelerator_falls_back_without_hardware() {
        let oracle = FixedOracle::none();
        let placement = Placement::resolve(DeviceSelector::Accelerator(0), &oracle);
        assert_eq!(placement, Placement::Host);
    }

    #[test]
    fn test_out_of_range_index_falls_back() {
        let oracle = FixedOracle::new(vec!["Test GPU".to_string()]);
        let placement = Placement::resolve(DeviceSelector::Accelerator(3), &oracle);
        assert_eq!(placement, Placement::Host);
    }

    #[test]
    fn test_accelerator_description_names_hardware() {
        let oracle = FixedOracle::new(vec!["GPU A".to_string(), "GPU B".to_string()]);
        let placement = Placement::resolve(DeviceSelector::Accelerator(1), &oracle);
        assert_eq!(placement, Placement::Accelerator(1));
        assert_eq!(placement.describe(&oracle), "[1]: GPU B");
    }
}
