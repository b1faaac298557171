// ============================================================
// Layer 3 — Sequence Graph Builder
// ============================================================
// Builds and runs the CNN labeler graph for one sentence at a
// time:
//
//   tokens ─► Lookup ─► Dropout(0.2) ─► Window ─► tanh(Wx+b) ─► Dropout(0.5)
//                                                                  │
//            scores ◄─ Linear ◄─ Concat ◄─ { avg, max, min } pool ◄┘
//
// Lifecycle:
//   1. ensure_capacity(n)     allocate n slots per position-wise node
//   2. bind_parameters(m, h)  wire every slot to the shared weights
//   3. forward(ctx, f, train) run one sentence; repeat as often as needed
//
// Slots are reused across sentences: each forward overwrites the
// outputs of the previous one. Growing capacity appends unbound
// slots, so step 2 must run again before the next forward.
//
// Reference: Kim (2014) Convolutional Neural Networks for Sentence Classification
//            Collobert et al. (2011) Natural Language Processing (Almost) from Scratch

use burn::prelude::*;

use crate::domain::{
    error::{GraphError, GraphResult},
    feature::Feature,
    node_kind::{NodeKind, PoolKind},
};
use crate::infra::metrics::ForwardMetrics;
use crate::ml::{
    context::ExecContext,
    nodes::{ConcatNode, DropoutNode, LinearNode, LookupNode, Node, PoolNode, UniNode, WindowEncoder},
    params::{HyperParams, LengthPolicy, ModelParams},
};

/// Settings captured at bind time and read on every forward
#[derive(Debug, Clone, Copy)]
struct Binding {
    vocab_size:          usize,
    max_sentence_length: usize,
    length_policy:       LengthPolicy,
}

/// Capacity-bounded slot graph for the CNN labeler, reused across sentences.
pub struct SequenceGraphBuilder<B: Backend> {
    word_inputs:          Vec<LookupNode<B>>,
    dropout_after_input:  Vec<DropoutNode<B>>,
    word_window:          WindowEncoder<B>,
    hidden:               Vec<UniNode<B>>,
    dropout_after_hidden: Vec<DropoutNode<B>>,

    avg_pooling: PoolNode<B>,
    max_pooling: PoolNode<B>,
    min_pooling: PoolNode<B>,
    concat:      ConcatNode<B>,
    output:      LinearNode<B>,

    binding:        Option<Binding>,
    bound_capacity: usize,
    active:         usize,
    metrics:        ForwardMetrics,
}

impl<B: Backend> Default for SequenceGraphBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> SequenceGraphBuilder<B> {
    /// Empty builder: no slots, nothing bound.
    pub fn new() -> Self {
        Self {
            word_inputs:          Vec::new(),
            dropout_after_input:  Vec::new(),
            word_window:          WindowEncoder::default(),
            hidden:               Vec::new(),
            dropout_after_hidden: Vec::new(),
            avg_pooling:          PoolNode::new(PoolKind::Average),
            max_pooling:          PoolNode::new(PoolKind::Max),
            min_pooling:          PoolNode::new(PoolKind::Min),
            concat:               ConcatNode::default(),
            output:               LinearNode::default(),
            binding:              None,
            bound_capacity:       0,
            active:               0,
            metrics:              ForwardMetrics::default(),
        }
    }

    /// Empty builder with `capacity` unbound slots already allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut builder = Self::new();
        builder.ensure_capacity(capacity);
        builder
    }

    // ─── Capacity ─────────────────────────────────────────────────────────────

    /// Grow every per-position slot collection to `capacity`.
    ///
    /// Capacity only grows: a request at or below the current
    /// capacity leaves the builder untouched. Existing slots keep
    /// their bindings; new slots are unbound until the next
    /// `bind_parameters`.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let current = self.capacity();
        if capacity <= current {
            tracing::trace!("Capacity {} already covers request for {}", current, capacity);
            return;
        }

        self.word_inputs.extend((current..capacity).map(LookupNode::new));
        self.dropout_after_input.resize_with(capacity, DropoutNode::default);
        self.word_window.resize(capacity);
        self.hidden.resize_with(capacity, UniNode::default);
        self.dropout_after_hidden.resize_with(capacity, DropoutNode::default);

        self.avg_pooling.set_capacity(capacity);
        self.max_pooling.set_capacity(capacity);
        self.min_pooling.set_capacity(capacity);

        tracing::debug!("Graph capacity grown {} → {} slots", current, capacity);
    }

    /// Release every slot and forget the bound parameters.
    pub fn clear(&mut self) {
        self.word_inputs.clear();
        self.dropout_after_input.clear();
        self.word_window.clear();
        self.hidden.clear();
        self.dropout_after_hidden.clear();
        self.avg_pooling.clear();
        self.max_pooling.clear();
        self.min_pooling.clear();
        self.concat.clear_output();
        self.output.clear_output();
        self.binding        = None;
        self.bound_capacity = 0;
        self.active         = 0;
    }

    /// Number of allocated per-position slots
    pub fn capacity(&self) -> usize {
        self.word_inputs.len()
    }

    /// Number of leading slots wired to parameters
    pub fn bound_capacity(&self) -> usize {
        self.bound_capacity
    }

    /// True once capacity is non-zero and every slot is bound
    pub fn is_ready(&self) -> bool {
        self.binding.is_some() && self.capacity() > 0 && self.bound_capacity == self.capacity()
    }

    // ─── Binding ──────────────────────────────────────────────────────────────

    /// Wire every slot to `model` and size every node from `hyper`.
    ///
    /// All weight shapes are checked first; on any mismatch the
    /// builder is left exactly as it was.
    pub fn bind_parameters(&mut self, model: &ModelParams<B>, hyper: &HyperParams) -> GraphResult<()> {
        hyper.validate()?;
        model.check_shapes(hyper)?;

        let capacity = self.capacity();
        if capacity == 0 {
            return Err(GraphError::Uninitialized { capacity: 0, bound: 0 });
        }

        for (lookup, hidden) in self.word_inputs.iter_mut().zip(self.hidden.iter_mut()) {
            lookup.bind(&model.words);
            hidden.bind(&model.hidden_linear);
        }
        for node in &mut self.dropout_after_input {
            node.init(hyper.word_dim, hyper.dropout_after_embedding);
        }
        for node in &mut self.dropout_after_hidden {
            node.init(hyper.hidden_size, hyper.dropout_after_hidden);
        }

        self.word_window.init(hyper.word_dim, hyper.word_context);
        self.avg_pooling.init(hyper.hidden_size);
        self.max_pooling.init(hyper.hidden_size);
        self.min_pooling.init(hyper.hidden_size);
        self.concat.init(hyper.concat_dim());
        self.output.bind(&model.olayer_linear);

        self.binding = Some(Binding {
            vocab_size:          hyper.vocab_size,
            max_sentence_length: hyper.max_sentence_length,
            length_policy:       hyper.length_policy,
        });
        self.bound_capacity = capacity;

        tracing::debug!(
            "Bound {} slots: word_dim={}, window={}, hidden={}, labels={}",
            capacity, hyper.word_dim, hyper.word_context, hyper.hidden_size, hyper.label_size,
        );
        Ok(())
    }

    // ─── Forward ──────────────────────────────────────────────────────────────

    /// Run one sentence through the graph and return its label scores.
    ///
    /// `train` is written into `ctx` before any node runs, so every
    /// dropout slot in this pass sees the same mode. The scores stay
    /// readable through [`Self::scores`] until the next call. A failed
    /// call leaves no slot output readable.
    pub fn forward(
        &mut self,
        ctx:     &mut ExecContext<B>,
        feature: &Feature,
        train:   bool,
    ) -> GraphResult<Tensor<B, 1>> {
        ctx.set_train(train);
        self.discard_outputs();

        let binding = match self.binding {
            Some(binding) if self.is_ready() => binding,
            _ => {
                return Err(GraphError::Uninitialized {
                    capacity: self.capacity(),
                    bound:    self.bound_capacity,
                })
            }
        };

        let raw = feature.len();
        if raw == 0 {
            return Err(GraphError::EmptyFeature);
        }
        let len = feature.active_len(binding.max_sentence_length);
        if raw > len {
            match binding.length_policy {
                LengthPolicy::Reject => {
                    return Err(GraphError::SentenceTooLong { len: raw, max: binding.max_sentence_length });
                }
                LengthPolicy::Truncate => {
                    tracing::warn!(
                        "Sentence of {} tokens truncated to {}; {} tokens ignored",
                        raw, len, raw - len,
                    );
                }
            }
        }
        if len > self.capacity() {
            return Err(GraphError::InsufficientCapacity { required: len, capacity: self.capacity() });
        }
        let words = &feature.words[..len];
        if let Some((position, &token)) =
            words.iter().enumerate().find(|(_, t)| **t as usize >= binding.vocab_size)
        {
            return Err(GraphError::TokenOutOfVocab { position, token, vocab_size: binding.vocab_size });
        }
        tracing::trace!("Forward pass: {} tokens, train={}", len, train);

        // Embedding lookup
        for (i, &token) in words.iter().enumerate() {
            self.word_inputs[i].forward(ctx, token)?;
        }

        // Dropout after embedding
        for i in 0..len {
            let embedded = self.word_inputs[i]
                .output()
                .ok_or(GraphError::MissingOutput { kind: NodeKind::Lookup, position: i })?;
            self.dropout_after_input[i].forward(ctx, embedded)?;
        }

        // Window context over the whole sentence
        let embedded = collect_outputs(&self.dropout_after_input[..len])?;
        self.word_window.forward(ctx, &embedded)?;

        // Per-position hidden projection
        for i in 0..len {
            let context = self.word_window
                .output_at(i)
                .ok_or(GraphError::MissingOutput { kind: NodeKind::Window, position: i })?;
            self.hidden[i].forward(ctx, context)?;
        }

        // Dropout after hidden
        for i in 0..len {
            let hidden = self.hidden[i]
                .output()
                .ok_or(GraphError::MissingOutput { kind: NodeKind::Hidden, position: i })?;
            self.dropout_after_hidden[i].forward(ctx, hidden)?;
        }

        // Sequence pooling
        let hidden = collect_outputs(&self.dropout_after_hidden[..len])?;
        self.avg_pooling.forward(ctx, &hidden)?;
        self.max_pooling.forward(ctx, &hidden)?;
        self.min_pooling.forward(ctx, &hidden)?;

        // avg ‖ max ‖ min
        let [avg, max, min] = pooled_outputs(&self.avg_pooling, &self.max_pooling, &self.min_pooling)?;
        self.concat.forward(ctx, [avg, max, min])?;

        // Label scores
        let joined = self.concat
            .output()
            .ok_or(GraphError::MissingOutput { kind: NodeKind::Concat, position: 0 })?;
        self.output.forward(ctx, joined)?;

        self.active = len;
        self.metrics.record(raw, len);

        self.output
            .output()
            .cloned()
            .ok_or(GraphError::MissingOutput { kind: NodeKind::Linear, position: 0 })
    }

    // ─── Slot Outputs ─────────────────────────────────────────────────────────

    /// Tokens consumed by the last successful forward
    pub fn active_len(&self) -> usize {
        self.active
    }

    /// Label scores of the last successful forward
    pub fn scores(&self) -> Option<&Tensor<B, 1>> {
        self.output.output()
    }

    /// Embedding fetched for position `i`
    pub fn lookup_output(&self, i: usize) -> Option<&Tensor<B, 1>> {
        self.active_slot(i).and_then(|i| self.word_inputs[i].output())
    }

    /// Embedding of position `i` after dropout
    pub fn input_dropout_output(&self, i: usize) -> Option<&Tensor<B, 1>> {
        self.active_slot(i).and_then(|i| self.dropout_after_input[i].output())
    }

    /// Window context vector of position `i`
    pub fn window_output(&self, i: usize) -> Option<&Tensor<B, 1>> {
        self.active_slot(i).and_then(|i| self.word_window.output_at(i))
    }

    /// Hidden projection of position `i`
    pub fn hidden_output(&self, i: usize) -> Option<&Tensor<B, 1>> {
        self.active_slot(i).and_then(|i| self.hidden[i].output())
    }

    /// Hidden vector of position `i` after dropout
    pub fn hidden_dropout_output(&self, i: usize) -> Option<&Tensor<B, 1>> {
        self.active_slot(i).and_then(|i| self.dropout_after_hidden[i].output())
    }

    /// `[avg, max, min]` from the last forward
    pub fn pooled(&self) -> Option<[&Tensor<B, 1>; 3]> {
        pooled_outputs(&self.avg_pooling, &self.max_pooling, &self.min_pooling).ok()
    }

    /// `avg ‖ max ‖ min` from the last forward
    pub fn concatenated(&self) -> Option<&Tensor<B, 1>> {
        self.concat.output()
    }

    /// Counters accumulated across forward calls
    pub fn metrics(&self) -> &ForwardMetrics {
        &self.metrics
    }

    /// Zero every forward counter
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Hide everything the previous pass produced
    fn discard_outputs(&mut self) {
        self.active = 0;
        self.avg_pooling.clear_output();
        self.max_pooling.clear_output();
        self.min_pooling.clear_output();
        self.concat.clear_output();
        self.output.clear_output();
    }

    fn active_slot(&self, i: usize) -> Option<usize> {
        (i < self.active).then_some(i)
    }
}

/// Clone the outputs of an ordered run of slots
fn collect_outputs<B, N>(nodes: &[N]) -> GraphResult<Vec<Tensor<B, 1>>>
where
    B: Backend,
    N: Node<B, Output = Tensor<B, 1>>,
{
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            node.output()
                .cloned()
                .ok_or(GraphError::MissingOutput { kind: node.kind(), position: i })
        })
        .collect()
}

fn pooled_outputs<'a, B: Backend>(
    avg: &'a PoolNode<B>,
    max: &'a PoolNode<B>,
    min: &'a PoolNode<B>,
) -> GraphResult<[&'a Tensor<B, 1>; 3]> {
    let get = |pool: &'a PoolNode<B>| {
        pool.output().ok_or(GraphError::MissingOutput { kind: pool.kind(), position: 0 })
    };
    Ok([get(avg)?, get(max)?, get(min)?])
}
