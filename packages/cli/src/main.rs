#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the crime-link similarity pipeline.
//!
//! Reads cleaned incident records and cached city coordinates, builds a
//! profile per city, scores every pair, and writes the similarity matrix,
//! threshold graph and city coordinates as JSON.

mod config;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_CONFIG, PipelineConfig};

#[derive(Parser)]
#[command(name = "crime_link", about = "City similarity from homicide records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the similarity report
    Run {
        /// Cleaned incident records CSV
        #[arg(long)]
        records: PathBuf,
        /// City coordinates CSV (`city,lat,lon`)
        #[arg(long)]
        coordinates: PathBuf,
        /// Pipeline config TOML (defaults to the built-in config)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Edge threshold, overriding the config
        #[arg(long)]
        threshold: Option<f64>,
        /// Output JSON path (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build and print city profiles as JSON
    Profiles {
        /// Cleaned incident records CSV
        #[arg(long)]
        records: PathBuf,
        /// City coordinates CSV (`city,lat,lon`)
        #[arg(long)]
        coordinates: PathBuf,
        /// Pipeline config TOML (defaults to the built-in config)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the built-in configuration
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            records,
            coordinates,
            config,
            threshold,
            output,
        } => {
            let mut config = PipelineConfig::load(config.as_deref())?;
            if let Some(threshold) = threshold {
                config = config.with_threshold(threshold)?;
            }

            let (records, locations) = pipeline::load_inputs(&records, &coordinates)?;
            let report = pipeline::run(&records, &locations, &config)?;
            pipeline::write_json(&report, output.as_deref())?;
        }
        Commands::Profiles {
            records,
            coordinates,
            config,
        } => {
            let config = PipelineConfig::load(config.as_deref())?;
            let (records, locations) = pipeline::load_inputs(&records, &coordinates)?;
            let profiles = pipeline::profiles(&records, &locations, &config)?;
            pipeline::write_json(&profiles, None)?;
        }
        Commands::Config => {
            PipelineConfig::embedded()?;
            print!("{DEFAULT_CONFIG}");
        }
    }

    Ok(())
}
