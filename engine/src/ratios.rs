//! Derived ratios computed once at startup.
//!
//! ```text
//! Z           = (283 / 399) × A / B
//! n21_z_ratio = (21^21 × A) / (Z × B) mod 1
//! X           = advance(n21_z_ratio)
//! ```
//!
//! Computing X consumes exactly one engine advance. X is then frozen and
//! reused by every key derivation.

use tracing::debug;

use crate::constants::{ConstantSet, METAPHYSICAL_BYTES};
use crate::decimal::Decimal;
use crate::energy::EnergyStateEngine;

/// Denominator paired with the key length in the Z ratio.
pub const Z_DENOMINATOR: u64 = 399;

/// Ratios frozen for the lifetime of a system instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedRatios {
    /// Z.
    pub z_ratio: Decimal,
    /// The value fed to the engine to produce X.
    pub n21_z_ratio: Decimal,
    /// X, in `[0, 1)`.
    pub metaphysical_x: Decimal,
}

/// Computes [`DerivedRatios`].
pub struct RatioCalculator;

impl RatioCalculator {
    /// Z = (283 / 399) × A / B. Pure.
    pub fn z_ratio(constants: &ConstantSet) -> Decimal {
        let fraction = &Decimal::from(METAPHYSICAL_BYTES as u64) / &Decimal::from(Z_DENOMINATOR);
        &(&fraction * constants.phi()) / constants.pi()
    }

    /// (21^21 × A) / (Z × B) mod 1. Pure.
    pub fn n21_z_ratio(constants: &ConstantSet, z_ratio: &Decimal) -> Decimal {
        let numerator = &constants.n21_decimal() * constants.phi();
        let denominator = z_ratio * constants.pi();
        (&numerator / &denominator).rem_euclid(&Decimal::one())
    }

    /// Compute Z and X, advancing `engine` exactly once.
    pub fn compute(constants: &ConstantSet, engine: &mut EnergyStateEngine) -> DerivedRatios {
        let z_ratio = Self::z_ratio(constants);
        let n21_z_ratio = Self::n21_z_ratio(constants, &z_ratio);
        let metaphysical_x = engine.advance(&n21_z_ratio);

        debug!(
            z_ratio = %z_ratio,
            n21_z_ratio = %n21_z_ratio,
            metaphysical_x = %metaphysical_x,
            "derived ratios computed"
        );

        DerivedRatios {
            z_ratio,
            n21_z_ratio,
            metaphysical_x,
        }
    }
}
