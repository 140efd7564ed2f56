//! N21 energy-state engine.
//!
//! This crate holds the numeric core behind N21 contributions:
//!
//! 1. **Constants**: φ, π, 2π and √5 carried at 80 fractional digits, plus the
//!    Bitcoin supply and halving figures and the 283-byte key length.
//!
//! 2. **Energy engine**: a mutable `(energy_state, cycle_phase,
//!    harmonic_resonance)` triple advanced by a single operation.
//!
//! 3. **Derived ratios**: Z and X, computed once per instance. Computing X
//!    advances the engine exactly once.
//!
//! 4. **Price gate**: rejects prices below 0.05.
//!
//! 5. **Byte transform**: mixes raw entropy with X and position-dependent
//!    halving factors into a key of the same length.
//!
//! ## Precision
//!
//! | Step                       | Domain                 |
//! |----------------------------|------------------------|
//! | Constants, engine, ratios  | [`Decimal`] (80 digits) |
//! | `supply_factor` in transform | `f64`                |
//!
//! The `f64` step is intentional; changing it changes every derived key.
//!
//! None of this is a vetted cryptographic construction.

pub mod constants;
pub mod decimal;
pub mod energy;
pub mod price;
pub mod ratios;
pub mod transform;

pub use constants::{
    ConstantSet, BITCOIN_ADDRESS, BITCOIN_SUPPLY, HALVING_INTERVAL, METAPHYSICAL_BYTES,
};
pub use decimal::{Decimal, ParseDecimalError, SCALE};
pub use energy::{EnergyMetrics, EnergyStateEngine};
pub use price::{PriceError, PriceGate};
pub use ratios::{DerivedRatios, RatioCalculator};
pub use transform::{ByteTransformer, KeyBytes};
