// ============================================================
// Layer 2/3 — ML Layer (Burn)
// ============================================================
// Everything that touches Burn tensors lives here:
//
//   params.rs   — HyperParams (Burn Config) and ModelParams
//                 (Burn Module holding the three weight tensors)
//
//   context.rs  — ExecContext: train flag, device, random source
//
//   nodes/      — The node kinds a sentence graph is built from:
//                 lookup, dropout, window, hidden / linear,
//                 pooling, concatenation
//
//   graph.rs    — SequenceGraphBuilder: capacity management,
//                 parameter binding and the forward pass
//
// Reference: Burn Book §3 (Building Blocks)

/// Hyperparameters and weight tensors
pub mod params;

/// Per-pass execution context
pub mod context;

/// Graph node kinds
pub mod nodes;

/// The sequence graph builder
pub mod graph;

/// CPU backend used by the test-suite and default consumers
pub type CpuBackend = burn::backend::NdArray;

/// GPU backend, enabled with the `wgpu` feature
#[cfg(feature = "wgpu")]
pub type GpuBackend = burn::backend::Wgpu;
