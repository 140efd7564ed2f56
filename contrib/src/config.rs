use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration for the n21 CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory where ledger snapshots are written
    #[serde(default = "default_export_dir")]
    pub directory: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset (e.g. "info", "n21=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load config, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if Self::exists(path) {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Check if config file exists
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    /// Default config location, `~/.n21/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        default_config_path()
    }
}

/// Get the default data directory (`~/.n21`), if a home directory is known
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".n21"))
}

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    default_data_dir().map(|dir| dir.join("config.toml"))
}
