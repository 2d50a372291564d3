// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn specific code for evaluation.
// The domain layer never imports burn; only this layer and the
// checkpoint manager in infra do.
//
// What's in this layer:
//
//   model.rs        — The MNIST autoencoder architecture and
//                     the ImageModel trait the evaluator runs
//
//   evaluator.rs    — Device selection, checkpoint loading,
//                     one timed no-gradient reconstruction
//
//   placement.rs    — Placement → Burn device per backend, and
//                     idempotent device transfers
//
//   image_tensor.rs — ImageSample ⇄ Tensor conversion
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §6 (Inference)

/// Autoencoder architecture
pub mod model;

/// Single-image reconstruction evaluator
pub mod evaluator;

/// Device resolution and transfers
pub mod placement;

/// Conversion between plain images and tensors
pub mod image_tensor;
