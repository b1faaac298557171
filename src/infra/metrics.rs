// ============================================================
// Layer 4 — Forward Metrics
// ============================================================
// Counters the graph builder updates on every forward call.
//
// Sentences longer than `max_sentence_length` are truncated under
// the default length policy. Each truncation is also logged with
// tracing::warn!, but the counters make it possible to check data
// loss after a whole corpus has been run.
//
// Metrics recorded:
//   - forward_calls:       completed forward passes
//   - truncated_sentences: passes that dropped trailing tokens
//   - dropped_tokens:      total tokens never processed
//   - tokens_processed:    total tokens that reached the graph

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardMetrics {
    pub forward_calls:       u64,
    pub truncated_sentences: u64,
    pub dropped_tokens:      u64,
    pub tokens_processed:    u64,
}

impl ForwardMetrics {
    /// Record one completed pass that consumed `active` of `raw` tokens.
    pub fn record(&mut self, raw: usize, active: usize) {
        self.forward_calls    += 1;
        self.tokens_processed += active as u64;
        if raw > active {
            self.truncated_sentences += 1;
            self.dropped_tokens      += (raw - active) as u64;
        }
    }

    /// Fraction of input tokens that were never processed
    pub fn dropped_fraction(&self) -> f64 {
        let total = self.tokens_processed + self.dropped_tokens;
        if total == 0 {
            0.0
        } else {
            self.dropped_tokens as f64 / total as f64
        }
    }

    /// Zero every counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
