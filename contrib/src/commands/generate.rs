//! Contribution command

use anyhow::Result;
use std::io::Write;

use crate::entropy::EntropySource;
use crate::ledger::{Contribution, Metadata};
use crate::system::ContributionSystem;

use super::print_success;

/// Hex characters of the key shown before truncating.
const KEY_PREVIEW_CHARS: usize = 64;

/// Build metadata from the optional free-text fields.
pub fn build_metadata(note: Option<&str>, intention: Option<&str>) -> Metadata {
    let mut metadata = Metadata::new();
    for (field, value) in [("note", note), ("intention", intention)] {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            metadata.insert(field.to_string(), value.to_string());
        }
    }
    metadata
}

/// Run the generate command
///
/// A rejected price comes back as a `PriceError` inside the `anyhow::Error`.
pub fn run<E: EntropySource, W: Write>(
    system: &mut ContributionSystem<E>,
    price_text: &str,
    metadata: Metadata,
    out: &mut W,
) -> Result<Contribution> {
    let price = system.parse_price(price_text)?;
    let contribution = system.contribute(&price, metadata)?;

    writeln!(out)?;
    print_success(out, "Contribution recorded")?;
    writeln!(out, "  Key:       {}…", &contribution.key[..KEY_PREVIEW_CHARS])?;
    writeln!(out, "  Length:    {} bytes", contribution.key.len() / 2)?;
    writeln!(out, "  Price:     {} BTC", contribution.price)?;
    writeln!(out, "  X:         {}", contribution.ratios.metaphysical_x)?;
    writeln!(out, "  Timestamp: {}", contribution.timestamp.to_rfc3339())?;

    Ok(contribution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use n21_engine::PriceError;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

    #[test]
    fn test_build_metadata_skips_blank_fields() {
        let metadata = build_metadata(Some("  hello "), Some("   "));
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["note"], "hello");

        assert!(build_metadata(None, None).is_empty());
    }

    #[test]
    fn test_run_prints_summary() {
        let mut system = ContributionSystem::new(ChaCha20Rng::seed_from_u64(4));
        let mut out = Vec::new();

        let contribution = run(&mut system, "0.05", build_metadata(Some("test"), None), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Contribution recorded"));
        assert!(text.contains(&contribution.key[..KEY_PREVIEW_CHARS]));
        assert!(text.contains("283 bytes"));
        assert!(text.contains("0.05 BTC"));
    }

    #[test]
    fn test_run_surfaces_price_error() {
        let mut system = ContributionSystem::new(ChaCha20Rng::seed_from_u64(4));
        let mut out = Vec::new();

        let err = run(&mut system, "0.01", Metadata::new(), &mut out).unwrap_err();

        assert!(err.downcast_ref::<PriceError>().is_some());
        assert_eq!(err.to_string(), "Price must be at least 0.05, got 0.01");
        assert!(out.is_empty());
        assert!(system.ledger().is_empty());
    }
}
