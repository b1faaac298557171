// ============================================================
// Layer 4 — Hyperparameter Store
// ============================================================
// Reads and writes HyperParams as pretty-printed JSON.
//
// Every load is validated, so a file with a zero dimension or a
// dropout rate of 1.0 is rejected here instead of at bind time.
//
// Example file:
//   {
//     "vocab_size": 20000,
//     "word_dim": 50,
//     "hidden_size": 100,
//     "label_size": 5,
//     "word_context": 2,
//     "dropout_after_embedding": 0.2,
//     "dropout_after_hidden": 0.5,
//     "max_sentence_length": 1024,
//     "length_policy": "Truncate"
//   }
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json documentation

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::ml::params::HyperParams;

/// Load and validate hyperparameters from a JSON file.
pub fn load_hyper_params(path: impl AsRef<Path>) -> Result<HyperParams> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Cannot read hyperparameters from '{}'", path.display()))?;

    let hyper: HyperParams = serde_json::from_str(&json)
        .with_context(|| format!("Malformed hyperparameters in '{}'", path.display()))?;
    hyper.validate()
        .with_context(|| format!("Rejected hyperparameters in '{}'", path.display()))?;

    tracing::debug!("Loaded hyperparameters from '{}'", path.display());
    Ok(hyper)
}

/// Save hyperparameters as pretty JSON, creating parent directories.
pub fn save_hyper_params(hyper: &HyperParams, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
    }

    let json = serde_json::to_string_pretty(hyper)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write hyperparameters to '{}'", path.display()))?;

    tracing::debug!("Saved hyperparameters to '{}'", path.display());
    Ok(())
}
