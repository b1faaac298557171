// ============================================================
// Layer 1 — Feature Domain Type
// ============================================================
// One sentence as the graph sees it: an ordered list of token
// ids produced upstream by a tokenizer / vocabulary lookup.
//
// The graph never reads text. By the time a Feature exists the
// words have already been mapped to rows of the embedding table.
//
// Example:
//   "the cat sat"  →  Feature { words: [4, 1187, 902] }
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// A single sentence expressed as embedding-table row indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Token ids in sentence order
    pub words: Vec<u32>,
}

impl Feature {
    /// Create a Feature from anything that yields token ids.
    ///
    /// Example:
    ///   let f = Feature::new([3, 14, 15]);
    pub fn new(words: impl IntoIterator<Item = u32>) -> Self {
        Self { words: words.into_iter().collect() }
    }

    /// Number of tokens, before any length cap is applied
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the sentence has no tokens
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of tokens a forward pass will actually consume
    /// under a cap of `max_len`.
    pub fn active_len(&self, max_len: usize) -> usize {
        self.words.len().min(max_len)
    }
}

impl From<Vec<u32>> for Feature {
    fn from(words: Vec<u32>) -> Self {
        Self { words }
    }
}
