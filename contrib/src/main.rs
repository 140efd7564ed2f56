//! N21 Contribution CLI
//!
//! Derives keys from system entropy and records them as contributions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use n21_contrib::{commands, config, ContributionSystem};

#[derive(Parser)]
#[command(name = "n21")]
#[command(about = "N21 contributions - derive and record metaphysical keys")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: ~/.n21/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default)
    Menu,

    /// Record one contribution and export the ledger
    Generate {
        /// Price in BTC (minimum 0.05)
        #[arg(short, long)]
        price: String,

        /// Free-text note stored with the contribution
        #[arg(long)]
        note: Option<String>,

        /// Free-text intention stored with the contribution
        #[arg(long)]
        intention: Option<String>,

        /// Export directory (overrides config)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show engine metrics and derived ratios
    Metrics,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .or_else(config::Config::default_path);
    let config = match &config_path {
        Some(path) => config::Config::load_or_default(path)?,
        None => config::Config::default(),
    };

    // Initialize logging
    let filter = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let mut system = ContributionSystem::with_os_entropy();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            commands::menu::run(&mut system, &config.export.directory, &mut stdin.lock(), &mut out)
        }
        Commands::Generate {
            price,
            note,
            intention,
            output,
        } => {
            let metadata =
                commands::generate::build_metadata(note.as_deref(), intention.as_deref());
            commands::generate::run(&mut system, &price, metadata, &mut out)?;

            let directory = output
                .map(PathBuf::from)
                .unwrap_or_else(|| config.export.directory.clone());
            commands::export::run(&system, &directory, &mut out)?;
            Ok(())
        }
        Commands::Metrics => commands::metrics::run(&system, &mut out),
    }
}
