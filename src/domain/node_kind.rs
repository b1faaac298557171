// ============================================================
// Layer 1 — Node Kinds
// ============================================================
// Tags for every computation unit the sequence graph is made of.
// Used by errors and logs to say which slot misbehaved, and by
// the `Node` trait so each node reports what it is.

use serde::{Deserialize, Serialize};

/// The three sequence reductions applied to the hidden layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Average,
    Max,
    Min,
}

/// Every node kind the builder allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Embedding table row fetch
    Lookup,
    /// Train-gated inverted dropout
    Dropout,
    /// Sliding-window context concatenation
    Window,
    /// Per-position `tanh(Wx + b)` projection
    Hidden,
    /// Sequence reduction
    Pool(PoolKind),
    /// Fixed-arity vector concatenation
    Concat,
    /// Bias-free output scoring layer
    Linear,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Lookup                  => write!(f, "lookup"),
            NodeKind::Dropout                 => write!(f, "dropout"),
            NodeKind::Window                  => write!(f, "window"),
            NodeKind::Hidden                  => write!(f, "hidden"),
            NodeKind::Pool(PoolKind::Average) => write!(f, "avg-pool"),
            NodeKind::Pool(PoolKind::Max)     => write!(f, "max-pool"),
            NodeKind::Pool(PoolKind::Min)     => write!(f, "min-pool"),
            NodeKind::Concat                  => write!(f, "concat"),
            NodeKind::Linear                  => write!(f, "linear"),
        }
    }
}
