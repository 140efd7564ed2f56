//! Per-byte key transform.
//!
//! For each position `i` and input byte `b`:
//!
//! ```text
//! phi_influence       = floor(A × 255) mod 256                  (fixed)
//! pi_influence        = floor(B × 255) mod 256                  (fixed)
//! metaphysical_factor = floor(X × phi_influence) mod 256        (fixed)
//! halving_cycle       = (i mod INTERVAL) / INTERVAL
//! halving_influence   = floor(halving_cycle × pi_influence) mod 256
//! supply_factor       = floor((b × SUPPLY × A) mod 255)         (f64)
//! out[i]              = (b + metaphysical_factor + halving_influence + supply_factor) mod 256
//! ```
//!
//! `supply_factor` is evaluated in `f64` on purpose. Its byte values are part
//! of the observable output and must not be computed at full precision.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;

use crate::constants::{ConstantSet, BITCOIN_SUPPLY, HALVING_INTERVAL, METAPHYSICAL_BYTES};
use crate::decimal::Decimal;

/// A key-sized byte buffer.
pub type KeyBytes = [u8; METAPHYSICAL_BYTES];

/// `value mod 256` as a byte (floor semantics).
fn wrap_byte(value: &BigInt) -> u8 {
    value.mod_floor(&BigInt::from(256u32)).to_u8().unwrap_or(0)
}

/// Deterministic byte mixer parameterised by the constants and X.
#[derive(Clone, Debug)]
pub struct ByteTransformer {
    phi_influence: u8,
    pi_influence: Decimal,
    metaphysical_factor: u8,
    interval: Decimal,
    phi_f64: f64,
    supply_f64: f64,
}

impl ByteTransformer {
    pub fn new(constants: &ConstantSet, metaphysical_x: &Decimal) -> Self {
        let byte_span = Decimal::from(255u64);

        let phi_influence = wrap_byte(&(constants.phi() * &byte_span).floor());
        let pi_influence = wrap_byte(&(constants.pi() * &byte_span).floor());
        let metaphysical_factor =
            wrap_byte(&(metaphysical_x * &Decimal::from(u64::from(phi_influence))).floor());

        Self {
            phi_influence,
            pi_influence: Decimal::from(u64::from(pi_influence)),
            metaphysical_factor,
            interval: Decimal::from(HALVING_INTERVAL),
            phi_f64: constants.phi().to_f64(),
            supply_f64: BITCOIN_SUPPLY as f64,
        }
    }

    pub fn phi_influence(&self) -> u8 {
        self.phi_influence
    }

    pub fn pi_influence(&self) -> u8 {
        self.pi_influence.floor().to_u8().unwrap_or(0)
    }

    /// Same value for every position of every call.
    pub fn metaphysical_factor(&self) -> u8 {
        self.metaphysical_factor
    }

    /// Contribution of the position within the halving interval.
    pub fn halving_influence(&self, index: usize) -> u8 {
        let position = Decimal::from(index as u64 % HALVING_INTERVAL);
        let halving_cycle = &position / &self.interval;
        wrap_byte(&(&halving_cycle * &self.pi_influence).floor())
    }

    /// Reduced-precision supply term for one input byte.
    pub fn supply_factor(&self, byte: u8) -> u8 {
        let raw = f64::from(byte) * self.supply_f64 * self.phi_f64;
        raw.rem_euclid(255.0).floor() as u8
    }

    /// Transform one byte at `index`.
    pub fn transform_byte(&self, index: usize, byte: u8) -> u8 {
        let sum = u32::from(byte)
            + u32::from(self.metaphysical_factor)
            + u32::from(self.halving_influence(index))
            + u32::from(self.supply_factor(byte));
        (sum % 256) as u8
    }

    /// Transform a full key buffer into a new buffer.
    pub fn transform(&self, data: &KeyBytes) -> KeyBytes {
        std::array::from_fn(|index| self.transform_byte(index, data[index]))
    }
}
