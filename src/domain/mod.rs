// ============================================================
// Layer 1 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer:
//
//   feature.rs    — Feature, the token-id sentence fed to the graph
//   node_kind.rs  — NodeKind / PoolKind tags for graph nodes
//   error.rs      — GraphError, the crate's error enum
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

/// Token-id sentence input
pub mod feature;

/// Node kind tags
pub mod node_kind;

/// Error type for graph construction and forward passes
pub mod error;
