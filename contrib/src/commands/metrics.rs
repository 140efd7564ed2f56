//! Engine metrics command

use anyhow::Result;
use std::io::Write;

use crate::entropy::EntropySource;
use crate::system::ContributionSystem;

/// Run the metrics command
pub fn run<E: EntropySource, W: Write>(system: &ContributionSystem<E>, out: &mut W) -> Result<()> {
    let metrics = system.metrics();
    let ratios = system.ratios();

    writeln!(out)?;
    writeln!(out, "Engine metrics")?;
    writeln!(out, "  Energy state:       {}", metrics.energy_state)?;
    writeln!(out, "  Cycle phase:        {}", metrics.cycle_phase)?;
    writeln!(out, "  Harmonic resonance: {}", metrics.harmonic_resonance)?;
    writeln!(out, "  Phi/Pi ratio:       {}", metrics.phi_pi_ratio)?;
    writeln!(out)?;
    writeln!(out, "Derived ratios")?;
    writeln!(out, "  Z:                  {}", ratios.z_ratio)?;
    writeln!(out, "  N21/Z ratio:        {}", ratios.n21_z_ratio)?;
    writeln!(out, "  X:                  {}", ratios.metaphysical_x)?;
    writeln!(out)?;
    writeln!(out, "Contributions this session: {}", system.ledger().len())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

    #[test]
    fn test_metrics_output() {
        let system = ContributionSystem::new(ChaCha20Rng::seed_from_u64(2));
        let mut out = Vec::new();

        run(&system, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("Cycle phase:        {}", system.metrics().cycle_phase)));
        assert!(text.contains(&system.ratios().metaphysical_x.to_string()));
        assert!(text.contains("Contributions this session: 0"));
    }
}
