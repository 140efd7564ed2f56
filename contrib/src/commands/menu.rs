//! Interactive menu

use anyhow::Result;
use n21_engine::PriceError;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

use crate::entropy::EntropySource;
use crate::system::ContributionSystem;

use super::{export, generate, metrics, print_error, print_warning, prompt_line};

const MENU: &str = "\
N21 Contribution Menu
  1. Generate contribution
  2. Export ledger
  3. Show engine metrics
  4. Exit";

/// Run the interactive menu until the user exits or input ends
pub fn run<E: EntropySource, R: BufRead, W: Write>(
    system: &mut ContributionSystem<E>,
    export_dir: &Path,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        writeln!(out)?;
        writeln!(out, "{}", MENU)?;

        let Some(choice) = prompt_line(input, out, "Select an option [1-4]: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(price) = prompt_line(input, out, "Price in BTC (minimum 0.05): ")? else {
                    break;
                };
                let note = prompt_line(input, out, "Note (optional): ")?.unwrap_or_default();
                let metadata = generate::build_metadata(Some(&note), None);

                if let Err(err) = generate::run(system, &price, metadata, out) {
                    match err.downcast_ref::<PriceError>() {
                        Some(price_err) => print_error(out, &price_err.to_string())?,
                        None => return Err(err),
                    }
                }
            }
            "2" => {
                if let Err(err) = export::run(system, export_dir, out) {
                    print_error(out, &format!("{:#}", err))?;
                }
            }
            "3" => metrics::run(system, out)?,
            "4" | "q" | "quit" | "exit" => break,
            other => print_warning(out, &format!("Unknown option: {}", other))?,
        }
    }

    debug!(contributions = system.ledger().len(), "menu closed");
    writeln!(out, "Goodbye.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::read_snapshot;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn drive(script: &str) -> (ContributionSystem<ChaCha20Rng>, String, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let mut system = ContributionSystem::new(ChaCha20Rng::seed_from_u64(10));
        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();

        run(&mut system, dir.path(), &mut input, &mut out).unwrap();

        (system, String::from_utf8(out).unwrap(), dir)
    }

    #[test]
    fn test_generate_then_exit() {
        let (system, text, _dir) = drive("1\n0.05\ntest\n4\n");

        assert_eq!(system.ledger().len(), 1);
        let contribution = system.ledger().iter().next().unwrap();
        assert_eq!(contribution.metadata["note"], "test");
        assert!(text.contains("Contribution recorded"));
        assert!(text.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_low_price_is_reported_and_loop_continues() {
        let (system, text, _dir) = drive("1\n0.01\n\n3\n4\n");

        assert!(system.ledger().is_empty());
        assert!(text.contains("Price must be at least 0.05, got 0.01"));
        assert!(text.contains("Engine metrics"));
    }

    #[test]
    fn test_malformed_price_is_reported() {
        let (system, text, _dir) = drive("1\nlots\n\n4\n");

        assert!(system.ledger().is_empty());
        assert!(text.contains("invalid price"));
    }

    #[test]
    fn test_export_from_menu() {
        let (_system, text, dir) = drive("1\n0.1\n\n1\n0.2\n\n2\n4\n");

        let exported: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(exported.len(), 1);
        assert_eq!(read_snapshot(&exported[0]).unwrap().contributions.len(), 2);
        assert!(text.contains("Ledger saved to"));
    }

    #[test]
    fn test_unknown_option_and_eof() {
        let (_system, text, _dir) = drive("9\n");

        assert!(text.contains("Unknown option: 9"));
        assert!(text.contains("Goodbye."));
    }
}
