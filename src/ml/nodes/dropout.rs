// ============================================================
// Layer 2 — Dropout Node
// ============================================================
// Inverted dropout, gated by the context's train flag:
//
//   eval   y = x
//   train  y_j = x_j * m_j / (1 - p),  m_j ~ Bernoulli(1 - p)
//
// The mask is drawn from the context's StdRng on the host and
// uploaded, so a seeded context replays the same masks.

use burn::{prelude::*, tensor::TensorData};
use rand::Rng;

use crate::domain::{
    error::{GraphError, GraphResult},
    node_kind::NodeKind,
};
use crate::ml::{
    context::ExecContext,
    nodes::{width, Node},
};

/// Train-gated dropout slot for one vector.
pub struct DropoutNode<B: Backend> {
    dim:    usize,
    rate:   f64,
    output: Option<Tensor<B, 1>>,
}

impl<B: Backend> Default for DropoutNode<B> {
    fn default() -> Self {
        Self { dim: 0, rate: 0.0, output: None }
    }
}

impl<B: Backend> DropoutNode<B> {
    /// Set the vector width and drop probability
    pub fn init(&mut self, dim: usize, rate: f64) {
        self.dim  = dim;
        self.rate = rate;
    }

    fn mask(&self, ctx: &mut ExecContext<B>) -> Tensor<B, 1> {
        let keep  = 1.0 - self.rate;
        let scale = (1.0 / keep) as f32;
        let rng   = ctx.rng();
        let values: Vec<f32> = (0..self.dim)
            .map(|_| if rng.random_bool(keep) { scale } else { 0.0 })
            .collect();
        Tensor::from_data(TensorData::new(values, [self.dim]), ctx.device())
    }
}

impl<B: Backend> Node<B> for DropoutNode<B> {
    type Input<'a> = &'a Tensor<B, 1>;
    type Output    = Tensor<B, 1>;

    fn kind(&self) -> NodeKind {
        NodeKind::Dropout
    }

    fn forward(&mut self, ctx: &mut ExecContext<B>, input: &Tensor<B, 1>) -> GraphResult<()> {
        if self.dim == 0 {
            return Err(GraphError::Unbound { kind: self.kind() });
        }
        let actual = width(input);
        if actual != self.dim {
            return Err(GraphError::ShapeMismatch { kind: self.kind(), expected: self.dim, actual });
        }

        let out = if ctx.is_train() && self.rate > 0.0 {
            input.clone() * self.mask(ctx)
        } else {
            input.clone()
        };
        self.output = Some(out);
        Ok(())
    }

    fn output(&self) -> Option<&Tensor<B, 1>> {
        self.output.as_ref()
    }
}
