//! Entropy sources for key derivation.
//!
//! The derivation treats its entropy as opaque: anything that can fill a
//! buffer with uniformly random bytes will do. Every `rand_core::RngCore`
//! qualifies, so production uses [`OsEntropy`] and tests use seeded RNGs.

use rand_core::RngCore;

/// Supplier of random bytes.
pub trait EntropySource {
    /// Fill `dest` completely.
    fn fill(&mut self, dest: &mut [u8]);
}

impl<R: RngCore> EntropySource for R {
    fn fill(&mut self, dest: &mut [u8]) {
        self.fill_bytes(dest);
    }
}

/// Operating-system entropy.
pub type OsEntropy = rand::rngs::OsRng;
