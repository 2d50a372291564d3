// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Whether an accelerator exists is a property of the machine,
// not of the program. Hiding it behind a trait lets the
// evaluator be driven by real hardware probing in production
// and by a fixed list in tests.
//
// Implementations:
//   - WgpuOracle  → enumerates GPU adapters through wgpu
//   - FixedOracle → a hard-coded list of device names
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

// ─── DeviceOracle ─────────────────────────────────────────────────────────────
/// Answers "which accelerators can I run on?".
pub trait DeviceOracle {
    /// Number of accelerators visible to the process.
    fn device_count(&self) -> usize;

    /// Hardware name of the accelerator at `index`, if it exists.
    fn device_name(&self, index: usize) -> Option<String>;

    /// True if at least one accelerator is visible.
    fn is_available(&self) -> bool {
        self.device_count() > 0
    }
}
