//! Stateful energy engine.
//!
//! The engine owns one mutable triple derived from the [`ConstantSet`]:
//!
//! ```text
//! energy_state₀      = (A·B / D) mod 1
//! harmonic_resonance = (A² + B²) mod C      (fixed after construction)
//! cycle_phase₀       = 0
//! ```
//!
//! [`EnergyStateEngine::advance`] is the only mutator. Each call:
//!
//! ```text
//! cycle_phase  ← (cycle_phase + A) mod C
//! transformed  ← (value × energy_state × harmonic_resonance) mod 1
//! energy_state ← (energy_state + transformed / A) mod 1
//! ```
//!
//! `transformed` is computed from the energy state as it was before the call.
//! Every `mod` is a floored remainder, so the ranges hold for negative input.

use tracing::trace;

use crate::constants::ConstantSet;
use crate::decimal::Decimal;

/// Point-in-time view of the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyMetrics {
    pub energy_state: Decimal,
    pub cycle_phase: Decimal,
    pub harmonic_resonance: Decimal,
    /// A / B.
    pub phi_pi_ratio: Decimal,
}

/// Engine holding the evolving energy state.
#[derive(Clone, Debug)]
pub struct EnergyStateEngine {
    phi: Decimal,
    tau: Decimal,
    phi_pi_ratio: Decimal,

    energy_state: Decimal,
    cycle_phase: Decimal,
    harmonic_resonance: Decimal,

    /// Number of `advance` calls since construction.
    advances: u64,
}

impl EnergyStateEngine {
    pub fn new(constants: &ConstantSet) -> Self {
        let one = Decimal::one();
        let phi = constants.phi();
        let pi = constants.pi();
        let tau = constants.tau();

        let energy_state = (&(phi * pi) / constants.root()).rem_euclid(&one);
        let harmonic_resonance = (&(phi * phi) + &(pi * pi)).rem_euclid(tau);

        Self {
            phi: phi.clone(),
            tau: tau.clone(),
            phi_pi_ratio: phi / pi,
            energy_state,
            cycle_phase: Decimal::zero(),
            harmonic_resonance,
            advances: 0,
        }
    }

    /// Advance the cycle and fold `value` into the energy state.
    ///
    /// Returns the transformed value, always in `[0, 1)`.
    pub fn advance(&mut self, value: &Decimal) -> Decimal {
        let one = Decimal::one();

        self.cycle_phase = (&self.cycle_phase + &self.phi).rem_euclid(&self.tau);

        let transformed = (&(value * &self.energy_state) * &self.harmonic_resonance).rem_euclid(&one);
        self.energy_state = (&self.energy_state + &(&transformed / &self.phi)).rem_euclid(&one);
        self.advances += 1;

        trace!(
            advances = self.advances,
            cycle_phase = %self.cycle_phase,
            energy_state = %self.energy_state,
            "energy state advanced"
        );

        transformed
    }

    pub fn metrics(&self) -> EnergyMetrics {
        EnergyMetrics {
            energy_state: self.energy_state.clone(),
            cycle_phase: self.cycle_phase.clone(),
            harmonic_resonance: self.harmonic_resonance.clone(),
            phi_pi_ratio: self.phi_pi_ratio.clone(),
        }
    }

    pub fn energy_state(&self) -> &Decimal {
        &self.energy_state
    }

    pub fn cycle_phase(&self) -> &Decimal {
        &self.cycle_phase
    }

    pub fn harmonic_resonance(&self) -> &Decimal {
        &self.harmonic_resonance
    }

    /// Number of times [`advance`](Self::advance) has run.
    pub fn advance_count(&self) -> u64 {
        self.advances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> (ConstantSet, EnergyStateEngine) {
        let constants = ConstantSet::new();
        let engine = EnergyStateEngine::new(&constants);
        (constants, engine)
    }

    fn in_unit_interval(value: &Decimal) -> bool {
        !value.is_negative() && value < &Decimal::one()
    }

    #[test]
    fn test_initial_state() {
        let (constants, engine) = engine();

        assert!(engine.cycle_phase().is_zero());
        assert_eq!(engine.advance_count(), 0);
        assert!(engine.energy_state().to_string().starts_with("0.27327"));
        assert!(engine.harmonic_resonance() < constants.tau());
        assert!(engine.harmonic_resonance().to_string().starts_with("6.2044"));
    }

    #[test]
    fn test_advance_moves_cycle_phase_by_phi() {
        let (constants, mut engine) = engine();

        engine.advance(&Decimal::new(5, 1));
        assert_eq!(engine.cycle_phase(), constants.phi());

        engine.advance(&Decimal::new(5, 1));
        engine.advance(&Decimal::new(5, 1));
        engine.advance(&Decimal::new(5, 1));

        // 4φ exceeds 2π once.
        let four_phi = &(&(constants.phi() + constants.phi()) + constants.phi()) + constants.phi();
        assert_eq!(engine.cycle_phase(), &(&four_phi - constants.tau()));
        assert_eq!(engine.advance_count(), 4);
    }

    #[test]
    fn test_advance_uses_previous_energy_state() {
        let (constants, mut engine) = engine();
        let before = engine.energy_state().clone();
        let value = Decimal::new(3, 1);

        let expected = (&(&value * &before) * engine.harmonic_resonance()).rem_euclid(&Decimal::one());
        let transformed = engine.advance(&value);
        assert_eq!(transformed, expected);

        let expected_energy = (&before + &(&transformed / constants.phi())).rem_euclid(&Decimal::one());
        assert_eq!(engine.energy_state(), &expected_energy);
    }

    #[test]
    fn test_advance_zero_keeps_energy() {
        let (_, mut engine) = engine();
        let before = engine.energy_state().clone();

        let transformed = engine.advance(&Decimal::zero());

        assert!(transformed.is_zero());
        assert_eq!(engine.energy_state(), &before);
    }

    #[test]
    fn test_negative_input_stays_in_range() {
        let (constants, mut engine) = engine();
        let before = engine.energy_state().clone();
        let value: Decimal = "-1.5".parse().unwrap();

        let transformed = engine.advance(&value);

        let product = &(&value * &before) * engine.harmonic_resonance();
        assert!(product.is_negative());
        assert_eq!(&transformed - &product, -Decimal::from(&product.floor()));
        assert!(in_unit_interval(&transformed));
        assert!(in_unit_interval(engine.energy_state()));
        assert_eq!(engine.cycle_phase(), constants.phi());
    }

    #[test]
    fn test_integral_product_transforms_to_zero() {
        let (constants, base) = engine();
        let mut engine = EnergyStateEngine {
            energy_state: Decimal::new(5, 1),
            harmonic_resonance: Decimal::from(2u64),
            ..base
        };

        // 0.5 × 2 × ±3 = ±3, an exact integer.
        for value in [Decimal::from(3u64), Decimal::from(-3i64)] {
            let transformed = engine.advance(&value);

            assert!(transformed.is_zero());
            assert!(!transformed.is_negative());
            assert_eq!(engine.energy_state(), &Decimal::new(5, 1));
        }
        assert_eq!(engine.cycle_phase(), &(constants.phi() + constants.phi()));
    }

    #[test]
    fn test_negative_zero_input_keeps_energy() {
        let (_, mut engine) = engine();
        let before = engine.energy_state().clone();

        let transformed = engine.advance(&"-0.0".parse().unwrap());

        assert!(transformed.is_zero());
        assert!(!transformed.is_negative());
        assert_eq!(engine.energy_state(), &before);
    }

    #[test]
    fn test_invariants_hold_with_alternating_signs() {
        let (constants, mut engine) = engine();

        for step in 1..=100i64 {
            let magnitude = Decimal::new(step * 104_729, 3);
            let value = if step % 2 == 0 { -magnitude } else { magnitude };
            let transformed = engine.advance(&value);

            assert!(in_unit_interval(&transformed));
            assert!(in_unit_interval(engine.energy_state()));
            assert!(!engine.cycle_phase().is_negative());
            assert!(engine.cycle_phase() < constants.tau());
        }
        assert_eq!(engine.advance_count(), 100);
    }

    #[test]
    fn test_invariants_hold_over_many_advances() {
        let (constants, mut engine) = engine();
        let harmonic = engine.harmonic_resonance().clone();

        for step in 1..=100u64 {
            let value = Decimal::from(step * 7919);
            let transformed = engine.advance(&value);

            assert!(in_unit_interval(&transformed));
            assert!(in_unit_interval(engine.energy_state()));
            assert!(!engine.cycle_phase().is_negative());
            assert!(engine.cycle_phase() < constants.tau());
            assert_eq!(engine.harmonic_resonance(), &harmonic);
        }
    }

    #[test]
    fn test_metrics_is_pure() {
        let (constants, engine) = engine();

        let first = engine.metrics();
        let second = engine.metrics();

        assert_eq!(first, second);
        assert_eq!(engine.advance_count(), 0);
        assert_eq!(first.phi_pi_ratio, constants.phi() / constants.pi());
    }
}
