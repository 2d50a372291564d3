// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the file system or the hardware:
//
//   checkpoint.rs    — Loading and saving model weights
//                      (Burn CompactRecorder or PyTorch pickles)
//                      plus the model_config.json beside them.
//
//   device_oracle.rs — Which accelerators exist. wgpu adapter
//                      enumeration in production, a fixed list
//                      when no accelerator is wanted.
//
//   image_store.rs   — Reading the input image (JSON or MNIST
//                      IDX) and writing the reconstruction.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Accelerator discovery
pub mod device_oracle;

/// Image input and output files
pub mod image_store;
