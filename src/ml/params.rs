// ============================================================
// Layer 2 — Hyperparameters and Model Parameters
// ============================================================
// HyperParams sizes every node in the sequence graph.
// ModelParams holds the three weight tensors the graph reads:
//
//   words          Embedding [vocab_size, word_dim]
//   hidden_linear  Linear    [word_dim * (2 * word_context + 1), hidden_size] + bias
//   olayer_linear  Linear    [3 * hidden_size, label_size], no bias
//
// The graph only ever reads these. Slots hold clones of the
// Burn modules, and cloning a Burn tensor clones a handle to
// the same storage, so one ModelParams can back any number of
// builders.
//
// Reference: Burn Book §3 (Building Blocks, Config)
//            Kim (2014) Convolutional Neural Networks for Sentence Classification

use burn::{
    nn::{Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::domain::error::{GraphError, GraphResult};

/// What to do with a sentence longer than `max_sentence_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthPolicy {
    /// Keep the first `max_sentence_length` tokens, log and count the rest
    #[default]
    Truncate,
    /// Fail the forward call with `GraphError::SentenceTooLong`
    Reject,
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct HyperParams {
    pub vocab_size:   usize,
    pub word_dim:     usize,
    pub hidden_size:  usize,
    pub label_size:   usize,
    /// Neighbours taken on EACH side of a position by the window encoder
    pub word_context: usize,

    #[config(default = 0.2)]
    pub dropout_after_embedding: f64,
    #[config(default = 0.5)]
    pub dropout_after_hidden:    f64,
    #[config(default = 1024)]
    pub max_sentence_length:     usize,
    #[config(default = "LengthPolicy::Truncate")]
    pub length_policy:           LengthPolicy,
}

impl HyperParams {
    /// Width of one window-encoder output: the centre word plus
    /// `word_context` neighbours on each side.
    pub fn window_dim(&self) -> usize {
        self.word_dim * (2 * self.word_context + 1)
    }

    /// Width of the avg ‖ max ‖ min concatenation
    pub fn concat_dim(&self) -> usize {
        3 * self.hidden_size
    }

    /// Range-check every field.
    pub fn validate(&self) -> GraphResult<()> {
        let dims = [
            ("vocab_size",          self.vocab_size),
            ("word_dim",            self.word_dim),
            ("hidden_size",         self.hidden_size),
            ("label_size",          self.label_size),
            ("max_sentence_length", self.max_sentence_length),
        ];
        for (name, value) in dims {
            if value == 0 {
                return Err(GraphError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        let rates = [
            ("dropout_after_embedding", self.dropout_after_embedding),
            ("dropout_after_hidden",    self.dropout_after_hidden),
        ];
        for (name, rate) in rates {
            if !(0.0..1.0).contains(&rate) {
                return Err(GraphError::InvalidConfig(format!(
                    "{name} must lie in [0, 1), got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Allocate freshly initialised weights matching these sizes.
    pub fn init_model<B: Backend>(&self, device: &B::Device) -> ModelParams<B> {
        let words         = EmbeddingConfig::new(self.vocab_size, self.word_dim).init(device);
        let hidden_linear = LinearConfig::new(self.window_dim(), self.hidden_size).init(device);
        let olayer_linear = LinearConfig::new(self.concat_dim(), self.label_size)
            .with_bias(false)
            .init(device);
        ModelParams { words, hidden_linear, olayer_linear }
    }
}

#[derive(Module, Debug)]
pub struct ModelParams<B: Backend> {
    pub words:         Embedding<B>,
    pub hidden_linear: Linear<B>,
    pub olayer_linear: Linear<B>,
}

impl<B: Backend> ModelParams<B> {
    /// Check every weight shape against `hyper`.
    /// Called by the binder before any slot is touched.
    pub fn check_shapes(&self, hyper: &HyperParams) -> GraphResult<()> {
        check_shape(
            "words",
            [hyper.vocab_size, hyper.word_dim],
            self.words.weight.val().dims(),
        )?;
        check_shape(
            "hidden_linear",
            [hyper.window_dim(), hyper.hidden_size],
            self.hidden_linear.weight.val().dims(),
        )?;
        if let Some(bias) = &self.hidden_linear.bias {
            let [len] = bias.val().dims();
            check_shape("hidden_linear.bias", [1, hyper.hidden_size], [1, len])?;
        }
        check_shape(
            "olayer_linear",
            [hyper.concat_dim(), hyper.label_size],
            self.olayer_linear.weight.val().dims(),
        )?;
        if let Some(bias) = &self.olayer_linear.bias {
            let [len] = bias.val().dims();
            check_shape("olayer_linear.bias", [1, hyper.label_size], [1, len])?;
        }
        Ok(())
    }
}

fn check_shape(name: &'static str, expected: [usize; 2], actual: [usize; 2]) -> GraphResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(GraphError::ParameterMismatch { name, expected, actual })
    }
}
