//! Thread-safe handle to a [`ContributionSystem`].
//!
//! The engine triple and the ledger are the only mutable state. Both sit
//! behind one mutex so a metrics read can never interleave with a ledger
//! write from another caller.

use std::sync::Arc;

use n21_engine::{Decimal, DerivedRatios, EnergyMetrics, KeyBytes, PriceError};
use parking_lot::Mutex;

use crate::entropy::{EntropySource, OsEntropy};
use crate::ledger::{Contribution, LedgerSnapshot, Metadata};
use crate::system::ContributionSystem;

/// Cloneable, lock-protected contribution system.
pub struct SharedContributionSystem<E = OsEntropy> {
    inner: Arc<Mutex<ContributionSystem<E>>>,
}

impl<E> Clone for SharedContributionSystem<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedContributionSystem<OsEntropy> {
    pub fn with_os_entropy() -> Self {
        Self::from_system(ContributionSystem::with_os_entropy())
    }
}

impl<E: EntropySource> SharedContributionSystem<E> {
    pub fn new(entropy: E) -> Self {
        Self::from_system(ContributionSystem::new(entropy))
    }

    pub fn from_system(system: ContributionSystem<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(system)),
        }
    }

    pub fn generate_key(&self, price: &Decimal) -> Result<KeyBytes, PriceError> {
        self.inner.lock().generate_key(price)
    }

    pub fn contribute(
        &self,
        price: &Decimal,
        metadata: Metadata,
    ) -> Result<Contribution, PriceError> {
        self.inner.lock().contribute(price, metadata)
    }

    pub fn parse_price(&self, text: &str) -> Result<Decimal, PriceError> {
        self.inner.lock().parse_price(text)
    }

    pub fn metrics(&self) -> EnergyMetrics {
        self.inner.lock().metrics()
    }

    pub fn ratios(&self) -> DerivedRatios {
        self.inner.lock().ratios().clone()
    }

    pub fn ledger_len(&self) -> usize {
        self.inner.lock().ledger().len()
    }

    pub fn export(&self) -> LedgerSnapshot {
        self.inner.lock().export()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
    use std::thread;

    #[test]
    fn test_concurrent_contributions() {
        let shared = SharedContributionSystem::new(ChaCha20Rng::seed_from_u64(21));
        let x = shared.ratios().metaphysical_x;
        let phase = shared.metrics().cycle_phase;

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for n in 0..5 {
                        let mut metadata = Metadata::new();
                        metadata.insert("note".into(), format!("worker {worker} #{n}"));
                        shared.contribute(&Decimal::new(1, 1), metadata).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(shared.ledger_len(), 20);
        assert_eq!(shared.ratios().metaphysical_x, x);
        assert_eq!(shared.metrics().cycle_phase, phase);

        let snapshot = shared.export();
        assert_eq!(snapshot.contributions.len(), 20);
    }

    #[test]
    fn test_shared_rejects_low_price() {
        let shared = SharedContributionSystem::new(ChaCha20Rng::seed_from_u64(1));
        assert!(shared.generate_key(&Decimal::new(4, 2)).is_err());
        assert!(shared.parse_price("0.049").is_err());
        assert_eq!(shared.ledger_len(), 0);
    }
}
