// ============================================================
// Layer 2 — Linear Nodes
// ============================================================
// Two slot kinds share the same Burn `Linear` wiring:
//
//   UniNode     y = tanh(W x + b)   per-position hidden projection
//   LinearNode  y = W x             output scores, no activation
//
// Burn stores W as [d_input, d_output]; a rank-1 input is lifted
// to [1, d_input] for the matmul and flattened back afterwards.

use burn::{nn::Linear, prelude::*, tensor::activation};

use crate::domain::{
    error::{GraphError, GraphResult},
    node_kind::NodeKind,
};
use crate::ml::{
    context::ExecContext,
    nodes::{width, Node},
};

fn project<B: Backend>(kind: NodeKind, linear: &Linear<B>, input: &Tensor<B, 1>) -> GraphResult<Tensor<B, 1>> {
    let [d_input, d_output] = linear.weight.val().dims();
    let actual = width(input);
    if actual != d_input {
        return Err(GraphError::ShapeMismatch { kind, expected: d_input, actual });
    }
    Ok(linear.forward(input.clone().unsqueeze::<2>()).reshape([d_output]))
}

// ─── UniNode ──────────────────────────────────────────────────────────────────
/// Hidden projection slot: `tanh(W x + b)`.
pub struct UniNode<B: Backend> {
    linear: Option<Linear<B>>,
    output: Option<Tensor<B, 1>>,
}

impl<B: Backend> Default for UniNode<B> {
    fn default() -> Self {
        Self { linear: None, output: None }
    }
}

impl<B: Backend> UniNode<B> {
    /// Share `linear`'s weights with this slot
    pub fn bind(&mut self, linear: &Linear<B>) {
        self.linear = Some(linear.clone());
    }
}

impl<B: Backend> Node<B> for UniNode<B> {
    type Input<'a> = &'a Tensor<B, 1>;
    type Output    = Tensor<B, 1>;

    fn kind(&self) -> NodeKind {
        NodeKind::Hidden
    }

    fn forward(&mut self, _ctx: &mut ExecContext<B>, input: &Tensor<B, 1>) -> GraphResult<()> {
        let linear = self.linear.as_ref().ok_or(GraphError::Unbound { kind: self.kind() })?;
        let pre    = project(self.kind(), linear, input)?;
        self.output = Some(activation::tanh(pre));
        Ok(())
    }

    fn output(&self) -> Option<&Tensor<B, 1>> {
        self.output.as_ref()
    }
}

// ─── LinearNode ───────────────────────────────────────────────────────────────
/// Output scoring slot: `W x`, no activation.
pub struct LinearNode<B: Backend> {
    linear: Option<Linear<B>>,
    output: Option<Tensor<B, 1>>,
}

impl<B: Backend> Default for LinearNode<B> {
    fn default() -> Self {
        Self { linear: None, output: None }
    }
}

impl<B: Backend> LinearNode<B> {
    /// Share `linear`'s weights with this slot
    pub fn bind(&mut self, linear: &Linear<B>) {
        self.linear = Some(linear.clone());
    }

    /// Forget the last computed scores
    pub fn clear_output(&mut self) {
        self.output = None;
    }
}

impl<B: Backend> Node<B> for LinearNode<B> {
    type Input<'a> = &'a Tensor<B, 1>;
    type Output    = Tensor<B, 1>;

    fn kind(&self) -> NodeKind {
        NodeKind::Linear
    }

    fn forward(&mut self, _ctx: &mut ExecContext<B>, input: &Tensor<B, 1>) -> GraphResult<()> {
        let linear = self.linear.as_ref().ok_or(GraphError::Unbound { kind: self.kind() })?;
        self.output = Some(project(self.kind(), linear, input)?);
        Ok(())
    }

    fn output(&self) -> Option<&Tensor<B, 1>> {
        self.output.as_ref()
    }
}
