// ============================================================
// Layer 2 — Graph Nodes
// ============================================================
// The computation units a sentence graph is assembled from.
// Each one is a slot: allocated once, bound to parameters once,
// then re-run for every sentence, overwriting its last output.
//
//   lookup.rs   — LookupNode     token id → embedding row
//   dropout.rs  — DropoutNode    train-gated inverted dropout
//   window.rs   — WindowEncoder  [x_{i-w} .. x_{i+w}] per position
//   linear.rs   — UniNode        tanh(W x + b)
//                 LinearNode     W x (output scores)
//   pool.rs     — PoolNode       avg / max / min over positions
//   concat.rs   — ConcatNode     a ‖ b ‖ c
//
// All vectors are rank-1 Burn tensors.

use burn::prelude::*;

use crate::domain::{error::GraphResult, node_kind::NodeKind};
use crate::ml::context::ExecContext;

pub mod concat;
pub mod dropout;
pub mod linear;
pub mod lookup;
pub mod pool;
pub mod window;

pub use concat::ConcatNode;
pub use dropout::DropoutNode;
pub use linear::{LinearNode, UniNode};
pub use lookup::LookupNode;
pub use pool::PoolNode;
pub use window::WindowEncoder;

/// Shared calling convention of every graph node.
///
/// `Input` is what the node consumes (a token id, one vector,
/// an ordered sequence of vectors, ...). `forward` stores the
/// result inside the node; `output` reads it back.
pub trait Node<B: Backend> {
    type Input<'a>;
    type Output: ?Sized;

    fn kind(&self) -> NodeKind;

    fn forward(&mut self, ctx: &mut ExecContext<B>, input: Self::Input<'_>) -> GraphResult<()>;

    /// Result of the most recent `forward`, if any
    fn output(&self) -> Option<&Self::Output>;
}

/// Length of a rank-1 tensor
pub(crate) fn width<B: Backend>(v: &Tensor<B, 1>) -> usize {
    let [n] = v.dims();
    n
}
