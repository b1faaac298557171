// ============================================================
// cnn-labeler-graph
// ============================================================
// Forward-only computation graph for a convolutional sentence
// classifier / labeler, built on Burn.
//
// Per sentence:
//   token ids → embedding lookup → dropout → sliding window
//             → tanh projection → dropout → avg / max / min pooling
//             → concatenation → linear label scores
//
// Layers:
//   domain/  — Feature, NodeKind, GraphError (no Burn types)
//   ml/      — params, execution context, nodes, graph builder
//   infra/   — hyperparameter JSON store, forward metrics
//
// Typical use:
//
//   let hyper = HyperParams::new(vocab, 50, 100, 5, 2);
//   let model = hyper.init_model::<CpuBackend>(&device);
//   let mut graph = SequenceGraphBuilder::with_capacity(hyper.max_sentence_length);
//   graph.bind_parameters(&model, &hyper)?;
//   let mut ctx = ExecContext::new(device, 42);
//   let scores = graph.forward(&mut ctx, &Feature::new(ids), false)?;

pub mod domain;
pub mod infra;
pub mod ml;

pub use domain::{
    error::{GraphError, GraphResult},
    feature::Feature,
    node_kind::{NodeKind, PoolKind},
};
pub use infra::metrics::ForwardMetrics;
pub use ml::{
    context::ExecContext,
    graph::SequenceGraphBuilder,
    nodes::Node,
    params::{HyperParams, LengthPolicy, ModelParams},
    CpuBackend,
};
