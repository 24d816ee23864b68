//! Configuration handling for the covenant CLI
//!
//! The effective contract configuration is resolved as: defaults, then a
//! TOML file, then the environment and command-line flags.

use anyhow::{Context, Result};
use covenant_contracts::{ContractConfig, ViolationReaction};
use std::fs;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when no path is given
pub const FILE_NAME: &str = "covenant.toml";

/// Load configuration from file or use defaults
///
/// An explicit `path` must exist. Without one the first existing file of
/// [`default_paths`] is used.
pub fn load_config(path: Option<&Path>) -> Result<ContractConfig> {
    if let Some(path) = path {
        return read_config(path);
    }
    match default_paths().into_iter().find(|p| p.exists()) {
        Some(path) => read_config(&path),
        None => Ok(ContractConfig::default()),
    }
}

/// `./covenant.toml`, then `~/.covenant/config.toml`
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(FILE_NAME)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".covenant").join("config.toml"));
    }
    paths
}

fn read_config(path: &Path) -> Result<ContractConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}

/// Save configuration to file
pub fn save_config(config: &ContractConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
    Ok(())
}

/// Settings given on the command line or in the environment
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub reaction: Option<ViolationReaction>,
    pub no_contracts: bool,
}

impl Overrides {
    pub fn apply(self, mut config: ContractConfig) -> ContractConfig {
        if let Some(reaction) = self.reaction {
            config.reaction = reaction;
        }
        if self.no_contracts {
            config.checks.all = false;
        }
        config
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod tests;
