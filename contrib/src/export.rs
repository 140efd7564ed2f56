//! JSON export of ledger snapshots.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::ledger::LedgerSnapshot;

/// File name for a snapshot taken at `at`, e.g.
/// `contributions_20240103_091500.json`.
pub fn snapshot_file_name(at: DateTime<Utc>) -> String {
    format!("contributions_{}.json", at.format("%Y%m%d_%H%M%S"))
}

/// Write `snapshot` as pretty JSON into `dir`, returning the file path.
pub fn write_snapshot(dir: &Path, snapshot: &LedgerSnapshot) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(snapshot_file_name(snapshot.exported_at));
    let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;

    // Write with restricted permissions
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    info!(
        path = %path.display(),
        contributions = snapshot.contributions.len(),
        "ledger exported"
    );

    Ok(path)
}

/// Read a snapshot previously written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<LedgerSnapshot> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Metadata;
    use crate::system::ContributionSystem;
    use chrono::TimeZone;
    use n21_engine::Decimal;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
    use tempfile::tempdir;

    #[test]
    fn test_snapshot_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 1, 3, 9, 15, 0).unwrap();
        assert_eq!(snapshot_file_name(at), "contributions_20240103_091500.json");
    }

    #[test]
    fn test_write_and_read_snapshot() {
        let dir = tempdir().unwrap();
        let mut system = ContributionSystem::new(ChaCha20Rng::seed_from_u64(8));
        let contribution = system.contribute(&Decimal::new(5, 2), Metadata::new()).unwrap();
        let snapshot = system.export();

        let path = write_snapshot(&dir.path().join("exports"), &snapshot).unwrap();
        assert!(path.exists());

        let loaded = read_snapshot(&path).unwrap();
        assert_eq!(loaded, snapshot);
        assert!(loaded.entry(&contribution.key).is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_export_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let system = ContributionSystem::new(ChaCha20Rng::seed_from_u64(9));
        let path = write_snapshot(dir.path(), &system.export()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
