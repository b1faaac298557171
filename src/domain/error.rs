// ============================================================
// Layer 1 — Graph Errors
// ============================================================
// Every way building or running the sequence graph can fail.
//
// Binding errors (ParameterMismatch, InvalidConfig) surface from
// `bind_parameters` and leave the builder unchanged. Forward
// errors (EmptyFeature, TokenOutOfVocab, SentenceTooLong, ...)
// are returned to the caller; no partial scores are produced.
//
// Reference: Rust Book §9 (Error Handling)

use thiserror::Error;

use crate::domain::node_kind::NodeKind;

/// Result alias used by every graph operation
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Errors raised while sizing, binding or running the graph.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    /// forward() before capacity was allocated and every slot bound
    #[error("graph is not ready: capacity {capacity}, bound slots {bound}")]
    Uninitialized { capacity: usize, bound: usize },

    /// Fewer slots are allocated than the sentence needs
    #[error("sentence needs {required} slots but only {capacity} are allocated")]
    InsufficientCapacity { required: usize, capacity: usize },

    /// Over-length sentence under `LengthPolicy::Reject`
    #[error("sentence has {len} tokens, limit is {max}")]
    SentenceTooLong { len: usize, max: usize },

    #[error("feature contains no tokens")]
    EmptyFeature,

    #[error("token {token} at position {position} is outside the vocabulary of {vocab_size}")]
    TokenOutOfVocab { position: usize, token: u32, vocab_size: usize },

    /// A weight tensor disagrees with the hyperparameters
    #[error("parameter '{name}' has shape {actual:?}, expected {expected:?}")]
    ParameterMismatch { name: &'static str, expected: [usize; 2], actual: [usize; 2] },

    /// A node received an input of the wrong width
    #[error("{kind} node expected input of width {expected}, got {actual}")]
    ShapeMismatch { kind: NodeKind, expected: usize, actual: usize },

    /// A node was run before being bound / initialised
    #[error("{kind} node used before it was bound")]
    Unbound { kind: NodeKind },

    /// A downstream node asked for an output the upstream slot never produced
    #[error("{kind} slot {position} has no output")]
    MissingOutput { kind: NodeKind, position: usize },

    #[error("invalid hyperparameters: {0}")]
    InvalidConfig(String),
}
