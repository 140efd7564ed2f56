//! Minimum-price gate for contributions.

use thiserror::Error;

use crate::decimal::{Decimal, ParseDecimalError};

/// Errors raised by the price gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("Price must be at least {minimum}, got {got}")]
    BelowMinimum { minimum: Decimal, got: Decimal },

    #[error("invalid price: {0}")]
    Malformed(#[from] ParseDecimalError),
}

/// Minimum accepted price in hundredths: 0.05.
const MIN_PRICE_HUNDREDTHS: i64 = 5;

/// Rejects prices below the minimum (0.05, inclusive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceGate {
    minimum: Decimal,
}

impl PriceGate {
    /// The default minimum price, 0.05.
    pub fn min_price() -> Decimal {
        Decimal::new(MIN_PRICE_HUNDREDTHS, 2)
    }

    pub fn new() -> Self {
        Self {
            minimum: Self::min_price(),
        }
    }

    pub fn minimum(&self) -> &Decimal {
        &self.minimum
    }

    /// True iff `price >= minimum`.
    pub fn validate(&self, price: &Decimal) -> bool {
        price >= &self.minimum
    }

    /// The rejection for `price`, or `None` if it passes.
    pub fn error_for(&self, price: &Decimal) -> Option<PriceError> {
        if self.validate(price) {
            None
        } else {
            Some(PriceError::BelowMinimum {
                minimum: self.minimum.clone(),
                got: price.clone(),
            })
        }
    }

    pub fn check(&self, price: &Decimal) -> Result<(), PriceError> {
        match self.error_for(price) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Parse user input and check it in one step.
    pub fn parse(&self, text: &str) -> Result<Decimal, PriceError> {
        let price: Decimal = text.parse()?;
        self.check(&price)?;
        Ok(price)
    }
}

impl Default for PriceGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_inclusive() {
        let gate = PriceGate::new();
        assert!(gate.validate(&Decimal::new(5, 2)));
        assert!(gate.validate(&"0.050".parse().unwrap()));
        assert!(gate.error_for(&Decimal::new(5, 2)).is_none());
    }

    #[test]
    fn test_min_price() {
        assert_eq!(PriceGate::min_price().to_string(), "0.05");
        assert_eq!(PriceGate::new().minimum(), &PriceGate::min_price());
    }

    #[test]
    fn test_below_minimum() {
        let gate = PriceGate::new();
        let price: Decimal = "0.0499999".parse().unwrap();
        assert!(!gate.validate(&price));
        assert!(!gate.validate(&Decimal::zero()));
        assert!(!gate.validate(&"-1".parse().unwrap()));
    }

    #[test]
    fn test_error_message() {
        let gate = PriceGate::new();
        let err = gate.error_for(&Decimal::new(1, 2)).unwrap();
        assert_eq!(err.to_string(), "Price must be at least 0.05, got 0.01");
    }

    #[test]
    fn test_parse() {
        let gate = PriceGate::new();
        assert_eq!(gate.parse("1.25").unwrap(), Decimal::new(125, 2));
        assert!(matches!(gate.parse("0.01"), Err(PriceError::BelowMinimum { .. })));
        assert!(matches!(gate.parse("abc"), Err(PriceError::Malformed(_))));
        assert!(matches!(gate.parse(""), Err(PriceError::Malformed(ParseDecimalError::Empty))));
    }
}
