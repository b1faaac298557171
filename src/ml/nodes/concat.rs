// ============================================================
// Layer 2 — Concat Node
// ============================================================
// Joins the three pooled vectors, in argument order, into one
// vector whose width must equal the configured total.

use burn::prelude::*;

use crate::domain::{
    error::{GraphError, GraphResult},
    node_kind::NodeKind,
};
use crate::ml::{
    context::ExecContext,
    nodes::{width, Node},
};

/// Concatenates the avg, max and min pooled vectors.
pub struct ConcatNode<B: Backend> {
    dim:    usize,
    output: Option<Tensor<B, 1>>,
}

impl<B: Backend> Default for ConcatNode<B> {
    fn default() -> Self {
        Self { dim: 0, output: None }
    }
}

impl<B: Backend> ConcatNode<B> {
    /// Set the expected total output width
    pub fn init(&mut self, dim: usize) {
        self.dim = dim;
    }

    /// Forget the last concatenation
    pub fn clear_output(&mut self) {
        self.output = None;
    }
}

impl<B: Backend> Node<B> for ConcatNode<B> {
    type Input<'a> = [&'a Tensor<B, 1>; 3];
    type Output    = Tensor<B, 1>;

    fn kind(&self) -> NodeKind {
        NodeKind::Concat
    }

    fn forward(&mut self, _ctx: &mut ExecContext<B>, parts: [&Tensor<B, 1>; 3]) -> GraphResult<()> {
        if self.dim == 0 {
            return Err(GraphError::Unbound { kind: self.kind() });
        }
        let total: usize = parts.iter().map(|p| width(p)).sum();
        if total != self.dim {
            return Err(GraphError::ShapeMismatch { kind: self.kind(), expected: self.dim, actual: total });
        }
        self.output = Some(Tensor::cat(parts.iter().map(|p| (*p).clone()).collect(), 0));
        Ok(())
    }

    fn output(&self) -> Option<&Tensor<B, 1>> {
        self.output.as_ref()
    }
}
