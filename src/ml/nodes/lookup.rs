// ============================================================
// Layer 2 — Lookup Node
// ============================================================
// Fetches one row of the shared embedding table.

use burn::{nn::Embedding, prelude::*};

use crate::domain::{
    error::{GraphError, GraphResult},
    node_kind::NodeKind,
};
use crate::ml::{context::ExecContext, nodes::Node};

/// Embedding-table lookup slot for one sentence position.
pub struct LookupNode<B: Backend> {
    table:    Option<Embedding<B>>,
    position: usize,
    output:   Option<Tensor<B, 1>>,
}

impl<B: Backend> LookupNode<B> {
    /// Unbound slot for sentence position `position`
    pub fn new(position: usize) -> Self {
        Self { table: None, position, output: None }
    }

    /// Point this slot at the embedding table. Shares storage.
    pub fn bind(&mut self, table: &Embedding<B>) {
        self.table = Some(table.clone());
    }
}

impl<B: Backend> Node<B> for LookupNode<B> {
    type Input<'a> = u32;
    type Output    = Tensor<B, 1>;

    fn kind(&self) -> NodeKind {
        NodeKind::Lookup
    }

    fn forward(&mut self, _ctx: &mut ExecContext<B>, token: u32) -> GraphResult<()> {
        let table = self.table.as_ref().ok_or(GraphError::Unbound { kind: self.kind() })?;
        let weight = table.weight.val();
        let [vocab_size, dim] = weight.dims();

        let row = token as usize;
        if row >= vocab_size {
            return Err(GraphError::TokenOutOfVocab {
                position: self.position,
                token,
                vocab_size,
            });
        }
        self.output = Some(weight.slice([row..row + 1, 0..dim]).reshape([dim]));
        Ok(())
    }

    fn output(&self) -> Option<&Tensor<B, 1>> {
        self.output.as_ref()
    }
}
