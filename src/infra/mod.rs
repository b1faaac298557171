// ============================================================
// Layer 4 — Infrastructure Layer
// ============================================================
// Concerns around the graph that are not part of the graph:
//
//   config_store.rs — HyperParams JSON load / save with
//                     validation and file-path error context
//
//   metrics.rs      — ForwardMetrics counters (forward calls,
//                     truncated sentences, dropped tokens)
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Hyperparameter persistence
pub mod config_store;

/// Forward-pass counters
pub mod metrics;
