//! Show or save the effective contract configuration

use anyhow::Result;
use colored::*;
use covenant_contracts::config;
use std::io::Write;
use std::path::Path;

pub fn run(out: &mut impl Write, save_to: Option<&Path>) -> Result<()> {
    let config = config::global();
    write!(out, "{}", toml::to_string_pretty(config)?)?;
    if let Some(path) = save_to {
        crate::config::save_config(config, path)?;
        writeln!(out, "{} Saved to {}", "✓".green(), path.display())?;
    }
    Ok(())
}
