//! The contribution system: engine, frozen ratios, gate, transformer and
//! ledger behind one owner.
//!
//! Construction advances the engine exactly once (to compute X). Key
//! derivation afterwards never touches the engine, so every contribution of
//! one instance reports the same X and the same cycle phase.

use n21_engine::{
    ByteTransformer, ConstantSet, Decimal, DerivedRatios, EnergyMetrics, EnergyStateEngine,
    KeyBytes, PriceError, PriceGate, RatioCalculator, METAPHYSICAL_BYTES,
};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::entropy::{EntropySource, OsEntropy};
use crate::ledger::{short_key, Contribution, ContributionLedger, LedgerSnapshot, Metadata};

/// Owns all per-process state for deriving and recording keys.
pub struct ContributionSystem<E = OsEntropy> {
    constants: ConstantSet,
    engine: EnergyStateEngine,
    ratios: DerivedRatios,
    gate: PriceGate,
    transformer: ByteTransformer,
    ledger: ContributionLedger,
    entropy: E,
}

impl ContributionSystem<OsEntropy> {
    /// System drawing from operating-system entropy.
    pub fn with_os_entropy() -> Self {
        Self::new(OsEntropy::default())
    }
}

impl<E: EntropySource> ContributionSystem<E> {
    pub fn new(entropy: E) -> Self {
        let constants = ConstantSet::new();
        let mut engine = EnergyStateEngine::new(&constants);
        let ratios = RatioCalculator::compute(&constants, &mut engine);
        let transformer = ByteTransformer::new(&constants, &ratios.metaphysical_x);

        debug!(
            metaphysical_factor = transformer.metaphysical_factor(),
            "contribution system ready"
        );

        Self {
            constants,
            engine,
            ratios,
            gate: PriceGate::new(),
            transformer,
            ledger: ContributionLedger::new(),
            entropy,
        }
    }

    /// Derive a key for `price`.
    ///
    /// The price is checked before any entropy is drawn; a rejected price
    /// consumes nothing.
    pub fn generate_key(&mut self, price: &Decimal) -> Result<KeyBytes, PriceError> {
        self.gate.check(price)?;

        let mut raw = Zeroizing::new([0u8; METAPHYSICAL_BYTES]);
        self.entropy.fill(raw.as_mut_slice());

        Ok(self.transformer.transform(&raw))
    }

    /// Derive a key and record it in the ledger.
    pub fn contribute(
        &mut self,
        price: &Decimal,
        metadata: Metadata,
    ) -> Result<Contribution, PriceError> {
        let key = self.generate_key(price)?;
        let key_hex = hex::encode(key);

        let contribution = self
            .ledger
            .record(
                key_hex,
                price.clone(),
                metadata,
                self.engine.metrics(),
                self.ratios.clone(),
            )
            .clone();

        info!(
            key = %short_key(&contribution.key),
            price = %contribution.price,
            total = self.ledger.len(),
            "contribution recorded"
        );

        Ok(contribution)
    }

    /// Parse and check a price entered by a user.
    pub fn parse_price(&self, text: &str) -> Result<Decimal, PriceError> {
        self.gate.parse(text)
    }

    pub fn metrics(&self) -> EnergyMetrics {
        self.engine.metrics()
    }

    pub fn ratios(&self) -> &DerivedRatios {
        &self.ratios
    }

    pub fn constants(&self) -> &ConstantSet {
        &self.constants
    }

    pub fn ledger(&self) -> &ContributionLedger {
        &self.ledger
    }

    /// Number of engine advances since construction (always one).
    pub fn engine_advances(&self) -> u64 {
        self.engine.advance_count()
    }

    pub fn export(&self) -> LedgerSnapshot {
        self.ledger.export(&self.constants, &self.ratios)
    }
}
