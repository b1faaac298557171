// ============================================================
// Layer 2 — Window Encoder
// ============================================================
// Local-context extractor. For every position i of a sentence of
// length n it concatenates the inputs at i-w ..= i+w:
//
//   out_i = x_{i-w} ‖ ... ‖ x_i ‖ ... ‖ x_{i+w}
//
// Positions outside 0..n contribute a zero vector, so the first
// and last words are encoded the same way as every other word.
// Output width is dim * (2w + 1).
//
// Owns one output slot per unit of capacity.

use burn::prelude::*;

use crate::domain::{
    error::{GraphError, GraphResult},
    node_kind::NodeKind,
};
use crate::ml::{
    context::ExecContext,
    nodes::{width, Node},
};

/// Sliding-window context encoder owning one output slot per position.
pub struct WindowEncoder<B: Backend> {
    dim:     usize,
    context: usize,
    slots:   Vec<Option<Tensor<B, 1>>>,
    active:  usize,
    ready:   bool,
}

impl<B: Backend> Default for WindowEncoder<B> {
    fn default() -> Self {
        Self { dim: 0, context: 0, slots: Vec::new(), active: 0, ready: false }
    }
}

impl<B: Backend> WindowEncoder<B> {
    /// Grow the output slots to `capacity`. Never shrinks.
    pub fn resize(&mut self, capacity: usize) {
        if capacity > self.slots.len() {
            self.slots.resize_with(capacity, || None);
        }
    }

    /// `dim` is the per-word input width, `context` the number of
    /// neighbours taken on each side.
    pub fn init(&mut self, dim: usize, context: usize) {
        self.dim     = dim;
        self.context = context;
        self.ready   = true;
    }

    /// Release every output slot
    pub fn clear(&mut self) {
        self.slots.clear();
        self.active = 0;
    }

    /// Number of allocated output slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Width of one context vector
    pub fn output_dim(&self) -> usize {
        self.dim * (2 * self.context + 1)
    }

    /// Context vector of position `i` from the last forward
    pub fn output_at(&self, i: usize) -> Option<&Tensor<B, 1>> {
        if i < self.active {
            self.slots[i].as_ref()
        } else {
            None
        }
    }
}

impl<B: Backend> Node<B> for WindowEncoder<B> {
    type Input<'a> = &'a [Tensor<B, 1>];
    type Output    = [Option<Tensor<B, 1>>];

    fn kind(&self) -> NodeKind {
        NodeKind::Window
    }

    fn forward(&mut self, ctx: &mut ExecContext<B>, inputs: &[Tensor<B, 1>]) -> GraphResult<()> {
        if !self.ready {
            return Err(GraphError::Unbound { kind: self.kind() });
        }
        let n = inputs.len();
        if n > self.slots.len() {
            return Err(GraphError::InsufficientCapacity { required: n, capacity: self.slots.len() });
        }
        if let Some(bad) = inputs.iter().map(width).find(|w| *w != self.dim) {
            return Err(GraphError::ShapeMismatch { kind: self.kind(), expected: self.dim, actual: bad });
        }

        let pad = Tensor::<B, 1>::zeros([self.dim], ctx.device());
        let w   = self.context as isize;
        for i in 0..n {
            let parts: Vec<Tensor<B, 1>> = (i as isize - w..=i as isize + w)
                .map(|j| {
                    if j >= 0 && (j as usize) < n {
                        inputs[j as usize].clone()
                    } else {
                        pad.clone()
                    }
                })
                .collect();
            self.slots[i] = Some(Tensor::cat(parts, 0));
        }
        self.active = n;
        Ok(())
    }

    fn output(&self) -> Option<&[Option<Tensor<B, 1>>]> {
        if self.active == 0 {
            None
        } else {
            Some(&self.slots[..self.active])
        }
    }
}
