//! N21 Contributions
//!
//! Session layer around the `n21-engine` core: draws entropy, derives keys,
//! records each derivation as a contribution and exports the ledger as JSON.
//!
//! ## Flow
//!
//! - Construction computes X once (one engine advance)
//! - Each contribution: price gate → entropy → byte transform → ledger
//! - Export: ledger snapshot → pretty JSON file
//!
//! Keys are not cryptographically secure and key uniqueness is not enforced.

pub mod commands;
pub mod config;
pub mod entropy;
pub mod export;
pub mod ledger;
pub mod shared;
pub mod system;

pub use entropy::{EntropySource, OsEntropy};
pub use ledger::{Contribution, ContributionLedger, LedgerSnapshot, Metadata};
pub use shared::SharedContributionSystem;
pub use system::ContributionSystem;
