//! covenant CLI - runs the demo programs under contract

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use covenant_contracts::{config as contracts, ViolationReaction};
use std::f64::consts::PI;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{factorial, increment, show_config, triangle};

#[derive(Parser)]
#[command(name = "covenant")]
#[command(about = "Design-by-contract demo programs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// What to do on a contract violation (abort, raise, log)
    #[arg(long, global = true, env = "COVENANT_REACTION")]
    reaction: Option<ViolationReaction>,

    /// Evaluate no contracts at all
    #[arg(long, global = true)]
    no_contracts: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print n:factorial(n) for n up to a limit
    Factorial {
        /// Largest argument
        #[arg(long, default_value = "20")]
        upto: i32,
    },

    /// Increment a value and print its new and old value
    Increment {
        /// Starting value
        #[arg(long, default_value = "5", allow_hyphen_values = true)]
        value: i32,
    },

    /// Translate, rotate and scale an isosceles triangle
    Triangle {
        /// Rotation in radians
        #[arg(long, default_value_t = PI / 6.0, allow_hyphen_values = true)]
        angle: f64,

        /// Scale factor
        #[arg(long, default_value_t = 1.5, allow_hyphen_values = true)]
        factor: f64,
    },

    /// Print the effective contract configuration
    Config {
        /// Also save it to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let overrides = config::Overrides {
        reaction: cli.reaction,
        no_contracts: cli.no_contracts,
    };
    let contract_config = overrides.apply(config::load_config(cli.config.as_deref())?);
    debug!("Effective contract configuration: {:?}", contract_config);
    contracts::init(contract_config).context("Failed to install contract configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Handle commands
    match cli.command {
        Commands::Factorial { upto } => factorial::run(&mut out, upto)?,
        Commands::Increment { value } => increment::run(&mut out, value)?,
        Commands::Triangle { angle, factor } => triangle::run(&mut out, angle, factor)?,
        Commands::Config { save } => show_config::run(&mut out, save.as_deref())?,
    }

    Ok(())
}
