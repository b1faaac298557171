// ============================================================
// Layer 2 — Execution Context
// ============================================================
// Per-pass state every node receives explicitly:
//   - the train / eval flag (read by dropout)
//   - the Burn device new tensors are created on
//   - the random source dropout masks are drawn from
//
// A context is not owned by the graph builder. One context per
// concurrently running builder.

use burn::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// Train flag, device and random source for one forward pass.
pub struct ExecContext<B: Backend> {
    train:  bool,
    device: B::Device,
    rng:    StdRng,
}

impl<B: Backend> ExecContext<B> {
    /// Context with a seeded random source; identical seeds give
    /// identical training-mode passes.
    pub fn new(device: B::Device, seed: u64) -> Self {
        Self { train: false, device, rng: StdRng::seed_from_u64(seed) }
    }

    /// Context seeded from operating-system entropy
    pub fn from_entropy(device: B::Device) -> Self {
        Self { train: false, device, rng: StdRng::from_os_rng() }
    }

    /// Switch between training and evaluation mode
    pub fn set_train(&mut self, train: bool) {
        self.train = train;
    }

    /// True while dropout should be active
    pub fn is_train(&self) -> bool {
        self.train
    }

    /// Device new tensors are allocated on
    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Random source for dropout masks
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}
