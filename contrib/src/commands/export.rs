//! Ledger export command

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::entropy::EntropySource;
use crate::export::write_snapshot;
use crate::system::ContributionSystem;

use super::{print_success, print_warning};

/// Run the export command
pub fn run<E: EntropySource, W: Write>(
    system: &ContributionSystem<E>,
    directory: &Path,
    out: &mut W,
) -> Result<PathBuf> {
    if system.ledger().is_empty() {
        print_warning(out, "No contributions recorded yet; exporting an empty ledger.")?;
    }

    let path = write_snapshot(directory, &system.export())?;

    writeln!(out)?;
    print_success(out, &format!("Ledger saved to: {}", path.display()))?;
    writeln!(out, "  Contributions: {}", system.ledger().len())?;

    Ok(path)
}
