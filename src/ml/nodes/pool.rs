// ============================================================
// Layer 2 — Pool Node
// ============================================================
// Reduces an ordered sequence of n vectors of width d to one
// vector of width d, elementwise across positions:
//
//   Average  y_j = (1/n) Σ_i x_ij
//   Max      y_j = max_i x_ij
//   Min      y_j = min_i x_ij
//
// The result width never depends on sentence length.

use burn::prelude::*;

use crate::domain::{
    error::{GraphError, GraphResult},
    node_kind::{NodeKind, PoolKind},
};
use crate::ml::{
    context::ExecContext,
    nodes::{width, Node},
};

/// Average, max or min reduction over a sentence's hidden vectors.
pub struct PoolNode<B: Backend> {
    pool:     PoolKind,
    dim:      usize,
    capacity: usize,
    output:   Option<Tensor<B, 1>>,
}

impl<B: Backend> PoolNode<B> {
    /// Unsized reducer of the given kind
    pub fn new(pool: PoolKind) -> Self {
        Self { pool, dim: 0, capacity: 0, output: None }
    }

    /// Largest sequence this reducer accepts
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = self.capacity.max(capacity);
    }

    /// Set the width of the vectors being reduced
    pub fn init(&mut self, dim: usize) {
        self.dim = dim;
    }

    /// Forget the last reduction
    pub fn clear_output(&mut self) {
        self.output = None;
    }

    /// Drop capacity and output; sizing from `init` is kept
    pub fn clear(&mut self) {
        self.capacity = 0;
        self.output   = None;
    }
}

impl<B: Backend> Node<B> for PoolNode<B> {
    type Input<'a> = &'a [Tensor<B, 1>];
    type Output    = Tensor<B, 1>;

    fn kind(&self) -> NodeKind {
        NodeKind::Pool(self.pool)
    }

    fn forward(&mut self, _ctx: &mut ExecContext<B>, inputs: &[Tensor<B, 1>]) -> GraphResult<()> {
        if self.dim == 0 {
            return Err(GraphError::Unbound { kind: self.kind() });
        }
        if inputs.is_empty() {
            return Err(GraphError::EmptyFeature);
        }
        if inputs.len() > self.capacity {
            return Err(GraphError::InsufficientCapacity {
                required: inputs.len(),
                capacity: self.capacity,
            });
        }
        if let Some(bad) = inputs.iter().map(width).find(|w| *w != self.dim) {
            return Err(GraphError::ShapeMismatch { kind: self.kind(), expected: self.dim, actual: bad });
        }

        // [n, dim] → [1, dim] → [dim]
        let stacked = Tensor::<B, 1>::stack::<2>(inputs.to_vec(), 0);
        let reduced = match self.pool {
            PoolKind::Average => stacked.mean_dim(0),
            PoolKind::Max     => stacked.max_dim(0),
            PoolKind::Min     => stacked.min_dim(0),
        };
        self.output = Some(reduced.reshape([self.dim]));
        Ok(())
    }

    fn output(&self) -> Option<&Tensor<B, 1>> {
        self.output.as_ref()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn run(pool: PoolKind, rows: &[[f32; 2]]) -> Vec<f32> {
        let mut ctx = ExecContext::<TestBackend>::new(Default::default(), 0);
        let xs: Vec<Tensor<TestBackend, 1>> =
            rows.iter().map(|r| Tensor::from_floats(*r, ctx.device())).collect();
        let mut node = PoolNode::new(pool);
        node.set_capacity(4);
        node.init(2);
        node.forward(&mut ctx, &xs).unwrap();
        node.output().unwrap().clone().into_data().to_vec().unwrap()
    }

    #[test]
    fn test_reductions() {
        let rows = [[1.0, -4.0], [3.0, 2.0], [-1.0, 5.0]];
        assert_eq!(run(PoolKind::Average, &rows), vec![1.0, 1.0]);
        assert_eq!(run(PoolKind::Max,     &rows), vec![3.0, 5.0]);
        assert_eq!(run(PoolKind::Min,     &rows), vec![-1.0, -4.0]);
    }

    #[test]
    fn test_single_row_is_identity() {
        for pool in [PoolKind::Average, PoolKind::Max, PoolKind::Min] {
            assert_eq!(run(pool, &[[0.25, -0.75]]), vec![0.25, -0.75]);
        }
    }

    #[test]
    fn test_empty_sequence_fails() {
        let mut ctx  = ExecContext::<TestBackend>::new(Default::default(), 0);
        let mut node = PoolNode::<TestBackend>::new(PoolKind::Max);
        node.set_capacity(2);
        node.init(2);
        let empty: Vec<Tensor<TestBackend, 1>> = Vec::new();
        assert_eq!(node.forward(&mut ctx, &empty), Err(GraphError::EmptyFeature));
    }

    #[test]
    fn test_clear_drops_capacity_and_output() {
        let mut ctx = ExecContext::<TestBackend>::new(Default::default(), 0);
        let xs      = vec![Tensor::<TestBackend, 1>::ones([2], ctx.device())];
        let mut node = PoolNode::new(PoolKind::Min);
        node.set_capacity(3);
        node.init(2);
        node.forward(&mut ctx, &xs).unwrap();
        assert!(node.output().is_some());

        node.clear();
        assert!(node.output().is_none());
        assert_eq!(
            node.forward(&mut ctx, &xs),
            Err(GraphError::InsufficientCapacity { required: 1, capacity: 0 })
        );
    }

    #[test]
    fn test_capacity_enforced() {
        let mut ctx = ExecContext::<TestBackend>::new(Default::default(), 0);
        let xs: Vec<Tensor<TestBackend, 1>> =
            (0..3).map(|_| Tensor::zeros([2], ctx.device())).collect();
        let mut node = PoolNode::new(PoolKind::Average);
        node.set_capacity(2);
        node.init(2);
        assert_eq!(
            node.forward(&mut ctx, &xs),
            Err(GraphError::InsufficientCapacity { required: 3, capacity: 2 })
        );
    }
}
