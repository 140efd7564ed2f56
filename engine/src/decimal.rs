//! Fixed-point decimal arithmetic for the energy-state domain.
//!
//! Every value is held as a big integer count of `10^-SCALE` units, so the
//! engine keeps 80 fractional digits through every operation. Addition,
//! subtraction and remainder are exact; multiplication and division round
//! back to `SCALE` digits with round-half-even.
//!
//! ```text
//! value = units / 10^SCALE
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;
use std::sync::OnceLock;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use thiserror::Error;

/// Number of fractional digits carried by every [`Decimal`].
pub const SCALE: u32 = 80;

/// `10^SCALE`, the integer representation of one.
fn unit() -> &'static BigInt {
    static UNIT: OnceLock<BigInt> = OnceLock::new();
    UNIT.get_or_init(|| pow10(SCALE))
}

pub(crate) fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u32).pow(exponent)
}

/// Divide and round to nearest, ties to even.
pub(crate) fn div_round_half_even(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let divisor = denominator.abs();
    let (quotient, remainder) = numerator.abs().div_rem(&divisor);
    let twice = remainder * 2u32;
    let quotient = match twice.cmp(&divisor) {
        Ordering::Greater => quotient + 1u32,
        Ordering::Equal if quotient.is_odd() => quotient + 1u32,
        _ => quotient,
    };
    if numerator.is_negative() != denominator.is_negative() {
        -quotient
    } else {
        quotient
    }
}

/// Errors produced when parsing a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDecimalError {
    #[error("empty decimal string")]
    Empty,

    #[error("no digits in decimal string")]
    NoDigits,

    #[error("invalid character {0:?} in decimal string")]
    InvalidCharacter(char),

    #[error("more than one decimal point")]
    MultiplePoints,

    #[error("too many fractional digits: {got} (max: {max})")]
    TooPrecise { got: usize, max: u32 },
}

/// High-precision fixed-point decimal.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Decimal {
    units: BigInt,
}

impl Decimal {
    /// Zero.
    pub fn zero() -> Self {
        Self {
            units: BigInt::zero(),
        }
    }

    /// One.
    pub fn one() -> Self {
        Self {
            units: unit().clone(),
        }
    }

    /// `mantissa × 10^-decimals`, e.g. `Decimal::new(5, 2)` is `0.05`.
    pub fn new(mantissa: i64, decimals: u32) -> Self {
        let mantissa = BigInt::from(mantissa);
        let units = if decimals <= SCALE {
            mantissa * pow10(SCALE - decimals)
        } else {
            div_round_half_even(&mantissa, &pow10(decimals - SCALE))
        };
        Self { units }
    }

    pub(crate) fn from_units(units: BigInt) -> Self {
        Self { units }
    }

    /// Parse a decimal string, rounding any digits beyond `SCALE`.
    ///
    /// [`FromStr`] rejects over-precise input instead; this variant is for
    /// literals known to carry extra digits.
    pub fn from_str_rounded(s: &str) -> Result<Self, ParseDecimalError> {
        parse(s, true)
    }

    pub fn is_zero(&self) -> bool {
        self.units.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.units.is_negative()
    }

    /// Truncated remainder: the result carries the sign of `self`.
    ///
    /// # Panics
    /// Panics if `modulus` is zero.
    pub fn modulo(&self, modulus: &Decimal) -> Decimal {
        Self {
            units: &self.units % &modulus.units,
        }
    }

    /// Floored remainder: for a positive `modulus` the result is in
    /// `[0, modulus)` whatever the sign of `self`.
    ///
    /// # Panics
    /// Panics if `modulus` is zero.
    pub fn rem_euclid(&self, modulus: &Decimal) -> Decimal {
        Self {
            units: self.units.mod_floor(&modulus.units),
        }
    }

    /// Largest integer not greater than `self`.
    pub fn floor(&self) -> BigInt {
        self.units.div_floor(unit())
    }

    /// Division returning `None` on a zero divisor.
    pub fn checked_div(&self, divisor: &Decimal) -> Option<Decimal> {
        if divisor.is_zero() {
            return None;
        }
        let scaled = &self.units * unit();
        Some(Self {
            units: div_round_half_even(&scaled, &divisor.units),
        })
    }

    /// Square root, truncated to `SCALE` digits. `None` for negative input.
    pub fn sqrt(&self) -> Option<Decimal> {
        if self.is_negative() {
            return None;
        }
        Some(Self {
            units: (&self.units * unit()).sqrt(),
        })
    }

    /// Nearest machine double.
    ///
    /// Goes through the decimal string so the conversion is correctly
    /// rounded regardless of magnitude.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }
}

fn parse(s: &str, allow_rounding: bool) -> Result<Decimal, ParseDecimalError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseDecimalError::Empty);
    }

    let (negative, body) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (int_part, frac_part) = match body.split_once('.') {
        Some((_, frac)) if frac.contains('.') => return Err(ParseDecimalError::MultiplePoints),
        Some((int, frac)) => (int, frac),
        None => (body, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ParseDecimalError::NoDigits);
    }
    if let Some(c) = int_part
        .chars()
        .chain(frac_part.chars())
        .find(|c| !c.is_ascii_digit())
    {
        return Err(ParseDecimalError::InvalidCharacter(c));
    }
    if !allow_rounding && frac_part.len() > SCALE as usize {
        return Err(ParseDecimalError::TooPrecise {
            got: frac_part.len(),
            max: SCALE,
        });
    }

    let mut digits = String::with_capacity(int_part.len() + frac_part.len() + 1);
    digits.push('0');
    digits.push_str(int_part);
    digits.push_str(frac_part);
    let raw = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or(ParseDecimalError::NoDigits)?;

    let frac_len = frac_part.len() as u32;
    let magnitude = if frac_len <= SCALE {
        raw * pow10(SCALE - frac_len)
    } else {
        div_round_half_even(&raw, &pow10(frac_len - SCALE))
    };

    Ok(Decimal {
        units: if negative { -magnitude } else { magnitude },
    })
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s, false)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int_part, frac_part) = self.units.abs().div_rem(unit());
        let sign = if self.units.is_negative() { "-" } else { "" };
        if frac_part.is_zero() {
            return write!(f, "{}{}", sign, int_part);
        }
        let frac = format!("{:0>width$}", frac_part.to_string(), width = SCALE as usize);
        write!(f, "{}{}.{}", sign, int_part, frac.trim_end_matches('0'))
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self {
            units: BigInt::from(value) * unit(),
        }
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Self {
            units: BigInt::from(value) * unit(),
        }
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl From<&BigInt> for Decimal {
    fn from(value: &BigInt) -> Self {
        Self {
            units: value * unit(),
        }
    }
}

impl<'a> Add<&'a Decimal> for &'a Decimal {
    type Output = Decimal;

    fn add(self, rhs: &'a Decimal) -> Decimal {
        Decimal {
            units: &self.units + &rhs.units,
        }
    }
}

impl<'a> Sub<&'a Decimal> for &'a Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &'a Decimal) -> Decimal {
        Decimal {
            units: &self.units - &rhs.units,
        }
    }
}

impl<'a> Mul<&'a Decimal> for &'a Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &'a Decimal) -> Decimal {
        Decimal {
            units: div_round_half_even(&(&self.units * &rhs.units), unit()),
        }
    }
}

impl<'a> Div<&'a Decimal> for &'a Decimal {
    type Output = Decimal;

    /// # Panics
    /// Panics on a zero divisor, like integer division. Use
    /// [`Decimal::checked_div`] for untrusted divisors.
    fn div(self, rhs: &'a Decimal) -> Decimal {
        let scaled = &self.units * unit();
        Decimal {
            units: div_round_half_even(&scaled, &rhs.units),
        }
    }
}

macro_rules! forward_owned_binop {
    ($($trait:ident $method:ident),*) => {
        $(
            impl $trait for Decimal {
                type Output = Decimal;

                fn $method(self, rhs: Decimal) -> Decimal {
                    (&self).$method(&rhs)
                }
            }

            impl<'a> $trait<&'a Decimal> for Decimal {
                type Output = Decimal;

                fn $method(self, rhs: &'a Decimal) -> Decimal {
                    (&self).$method(rhs)
                }
            }
        )*
    };
}

forward_owned_binop!(Add add, Sub sub, Mul mul, Div div);

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal { units: -self.units }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Decimal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Decimal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
