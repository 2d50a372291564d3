// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that describe what an
// evaluation is about: which device to run on, what an image
// looks like, what can go wrong and what gets reported.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Device selector and resolved placement
pub mod device;

// Precondition errors of the evaluation sequence
pub mod error;

// A single image as plain data
pub mod image;

// The summary printed after a reconstruction
pub mod report;

// Core abstractions (traits) that other layers implement
pub mod traits;
