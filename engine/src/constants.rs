//! Fixed constants driving the engine, ratio calculator and transformer.
//!
//! | Symbol | Value          | Source                                   |
//! |--------|----------------|------------------------------------------|
//! | A      | φ (golden)     | `(1 + √5) / 2`                           |
//! | B      | π              | Machin's formula                         |
//! | C      | 2π             | doubled B                                |
//! | D      | √5             | derived root, `2A − 1`                   |
//!
//! A and B are computed in integer arithmetic with guard digits and then
//! rounded to [`SCALE`], so no digit is lost to a literal that is too short.
//! The supply and halving figures are Bitcoin's.

use num_bigint::BigInt;
use num_traits::Zero;

use crate::decimal::{div_round_half_even, pow10, Decimal, SCALE};

/// Total coin supply.
pub const BITCOIN_SUPPLY: u64 = 21_000_000;

/// Blocks between halvings.
pub const HALVING_INTERVAL: u64 = 210_000;

/// Length of every derived key in bytes.
pub const METAPHYSICAL_BYTES: usize = 283;

/// Base and exponent of the N21 constant (`21^21`).
pub const N21_BASE: u32 = 21;
pub const N21_EXPONENT: u32 = 21;

/// Fixed address reported with every contribution.
pub const BITCOIN_ADDRESS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

/// Extra digits carried while deriving A and B.
const GUARD_DIGITS: u32 = 12;

/// Immutable constant set shared by every engine component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstantSet {
    phi: Decimal,
    pi: Decimal,
    tau: Decimal,
    root: Decimal,
    n21: BigInt,
}

impl ConstantSet {
    pub const SUPPLY: u64 = BITCOIN_SUPPLY;
    pub const INTERVAL: u64 = HALVING_INTERVAL;
    pub const KEY_BYTES: usize = METAPHYSICAL_BYTES;

    pub fn new() -> Self {
        let guard_unit = pow10(SCALE + GUARD_DIGITS);
        let guard = pow10(GUARD_DIGITS);

        // √5 at guarded precision: floor(sqrt(5 · 10^(2p))).
        let root_five = (BigInt::from(5u32) * &guard_unit * &guard_unit).sqrt();
        let phi_units = (&guard_unit + &root_five) / 2u32;
        let pi_units = machin_pi(&guard_unit);

        let phi = Decimal::from_units(div_round_half_even(&phi_units, &guard));
        let pi = Decimal::from_units(div_round_half_even(&pi_units, &guard));
        let tau = &pi + &pi;
        let root = &(&phi + &phi) - &Decimal::one();

        Self {
            phi,
            pi,
            tau,
            root,
            n21: BigInt::from(N21_BASE).pow(N21_EXPONENT),
        }
    }

    /// A: the golden ratio.
    pub fn phi(&self) -> &Decimal {
        &self.phi
    }

    /// B: π.
    pub fn pi(&self) -> &Decimal {
        &self.pi
    }

    /// C: 2π, the modulus of the cycle phase.
    pub fn tau(&self) -> &Decimal {
        &self.tau
    }

    /// D: √5.
    pub fn root(&self) -> &Decimal {
        &self.root
    }

    /// `21^21` as an exact integer.
    pub fn n21(&self) -> &BigInt {
        &self.n21
    }

    /// `21^21` lifted into the decimal domain without rounding.
    pub fn n21_decimal(&self) -> Decimal {
        Decimal::from(&self.n21)
    }
}

impl Default for ConstantSet {
    fn default() -> Self {
        Self::new()
    }
}

/// π = 16·atan(1/5) − 4·atan(1/239), scaled by `unit`.
fn machin_pi(unit: &BigInt) -> BigInt {
    arctan_inverse(5, unit) * 16u32 - arctan_inverse(239, unit) * 4u32
}

/// atan(1/x) scaled by `unit`, by the alternating Taylor series.
fn arctan_inverse(x: u32, unit: &BigInt) -> BigInt {
    let x_squared = BigInt::from(x) * x;
    let mut power = unit / x;
    let mut sum = power.clone();
    let mut k: u32 = 1;
    loop {
        power /= &x_squared;
        if power.is_zero() {
            break;
        }
        let term = &power / (2 * k + 1);
        if k % 2 == 1 {
            sum -= term;
        } else {
            sum += term;
        }
        k += 1;
    }
    sum
}
