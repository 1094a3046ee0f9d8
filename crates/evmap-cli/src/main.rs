//! evmap - Command-line tool for live charging station availability
//!
//! Looks up the live status of a charge location through the configured
//! charger networks, or runs the chargepoint matcher on a local file.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "evmap")]
#[command(author, version, about = "Live charging station availability")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "EVMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Output format [default: table]
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up live availability for a charge location
    Status {
        /// Charge location JSON file ({id, name, coordinates, chargepoints})
        location: PathBuf,

        /// Only show these plug types (equivalent labels included)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        types: Vec<String>,

        /// Only show chargepoints above this power in kW
        #[arg(long, value_name = "KW")]
        min_power: Option<f64>,
    },

    /// Match raw connectors against canonical chargepoints offline
    Match {
        /// Input JSON file ({chargepoints, connectors})
        input: PathBuf,
    },

    /// List configured detectors in priority order
    Detectors,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring default config file");
            Config::default()
        })
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(cli.output, cli.no_color)?;

    // Create output context
    let ctx = OutputContext::new(merged.output, merged.no_color, cli.quiet);

    // Execute command
    match &cli.command {
        Commands::Status {
            location,
            types,
            min_power,
        } => {
            commands::status(&config.detectors, location, types, *min_power, &ctx).await?;
        }

        Commands::Match { input } => {
            commands::match_connectors(input, &ctx)?;
        }

        Commands::Detectors => {
            commands::detectors(&config.detectors, &ctx)?;
        }
    }

    Ok(())
}
