//! In-memory contribution ledger.
//!
//! Records are keyed by the hex form of their derived key and kept in
//! insertion order. Keys are not guaranteed unique: recording an existing key
//! replaces the earlier record in place.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use n21_engine::{
    ConstantSet, Decimal, DerivedRatios, EnergyMetrics, BITCOIN_ADDRESS, BITCOIN_SUPPLY,
    HALVING_INTERVAL, METAPHYSICAL_BYTES,
};
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use tracing::warn;

/// Caller-supplied free-form metadata.
pub type Metadata = BTreeMap<String, String>;

/// One recorded key derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub key: String,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
    pub metadata: Metadata,
    pub metrics: EnergyMetrics,
    pub ratios: DerivedRatios,
}

/// Exported form of a [`Contribution`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionEntry {
    pub timestamp: DateTime<Utc>,
    pub price_btc: Decimal,
    pub metaphysical_x: Decimal,
    pub spiritual_metrics: EnergyMetrics,
    pub n21_z_ratio: Decimal,
    pub bitcoin_address: String,
    pub metadata: Metadata,
}

impl From<&Contribution> for ContributionEntry {
    fn from(contribution: &Contribution) -> Self {
        Self {
            timestamp: contribution.timestamp,
            price_btc: contribution.price.clone(),
            metaphysical_x: contribution.ratios.metaphysical_x.clone(),
            spiritual_metrics: contribution.metrics.clone(),
            n21_z_ratio: contribution.ratios.n21_z_ratio.clone(),
            bitcoin_address: BITCOIN_ADDRESS.to_string(),
            metadata: contribution.metadata.clone(),
        }
    }
}

/// Constant context written alongside the records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConstants {
    pub bitcoin_supply: u64,
    pub halving_interval: u64,
    pub metaphysical_bytes: usize,
    /// 21^21, which does not fit a JSON number.
    pub n_constant: String,
    pub z_ratio: Decimal,
}

/// Immutable export of the whole ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub exported_at: DateTime<Utc>,
    pub bitcoin_address: String,
    pub constants: SnapshotConstants,
    /// Keyed by hex key, in ledger insertion order.
    #[serde(with = "keyed_in_order")]
    pub contributions: Vec<(String, ContributionEntry)>,
}

impl LedgerSnapshot {
    /// Entry recorded under `key_hex`.
    pub fn entry(&self, key_hex: &str) -> Option<&ContributionEntry> {
        self.contributions
            .iter()
            .find(|(key, _)| key == key_hex)
            .map(|(_, entry)| entry)
    }
}

/// Serializes keyed pairs as a JSON object without reordering them.
mod keyed_in_order {
    use super::*;

    pub fn serialize<S: Serializer>(
        entries: &[(String, ContributionEntry)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, entry) in entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, ContributionEntry)>, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }

    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, ContributionEntry)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of hex keys to contribution entries")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, entry)) = access.next_entry()? {
                entries.push((key, entry));
            }
            Ok(entries)
        }
    }
}

/// Session ledger of contributions.
#[derive(Clone, Debug, Default)]
pub struct ContributionLedger {
    entries: Vec<Contribution>,
    index: HashMap<String, usize>,
}

impl ContributionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a contribution, replacing any record with the same key.
    pub fn record(
        &mut self,
        key_hex: String,
        price: Decimal,
        metadata: Metadata,
        metrics: EnergyMetrics,
        ratios: DerivedRatios,
    ) -> &Contribution {
        let contribution = Contribution {
            key: key_hex.clone(),
            timestamp: Utc::now(),
            price,
            metadata,
            metrics,
            ratios,
        };

        let position = match self.index.get(&key_hex).copied() {
            Some(position) => {
                warn!(key = %short_key(&key_hex), "contribution key collision, overwriting");
                self.entries[position] = contribution;
                position
            }
            None => {
                self.entries.push(contribution);
                self.index.insert(key_hex, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        &self.entries[position]
    }

    pub fn get(&self, key_hex: &str) -> Option<&Contribution> {
        self.index.get(key_hex).map(|&position| &self.entries[position])
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Contribution> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot every record with the constant and ratio context.
    pub fn export(&self, constants: &ConstantSet, ratios: &DerivedRatios) -> LedgerSnapshot {
        LedgerSnapshot {
            exported_at: Utc::now(),
            bitcoin_address: BITCOIN_ADDRESS.to_string(),
            constants: SnapshotConstants {
                bitcoin_supply: BITCOIN_SUPPLY,
                halving_interval: HALVING_INTERVAL,
                metaphysical_bytes: METAPHYSICAL_BYTES,
                n_constant: constants.n21().to_string(),
                z_ratio: ratios.z_ratio.clone(),
            },
            contributions: self
                .entries
                .iter()
                .map(|c| (c.key.clone(), ContributionEntry::from(c)))
                .collect(),
        }
    }
}

/// First 16 hex characters, for log lines.
pub fn short_key(key_hex: &str) -> &str {
    key_hex.get(..16).unwrap_or(key_hex)
}
