//! cxfw - CX2070x DSP firmware loader
//!
//! Downloads S-record firmware images into a Conexant CX2070x codec.
//!
//! # Architecture
//!
//! All protocol logic lives in `cxfw-core` and talks to the codec through
//! the `RegisterPort` trait. Programmers provide that trait:
//! - **dummy** - An emulated codec, for trying images without hardware
//! - **linux_i2c** - A codec on a Linux I2C adapter via `/dev/i2c-N`
//!
//! The commands only see `&mut dyn RegisterPort`, so they work the same
//! regardless of the programmer in use.

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};
use cxfw_core::config::LoaderConfig;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still overrides the verbosity flags
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(cli.verbose)),
    )
    .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Decode { input, summary } => commands::run_decode(&input, &config, summary),
        Commands::Load {
            programmer,
            input,
            wait,
            no_version,
        } => programmers::with_programmer(&programmer, |port| {
            commands::run_load(port, &input, &config, wait)?;
            if !no_version {
                commands::run_version(port)?;
            }
            Ok(())
        }),
        Commands::Version { programmer } => {
            programmers::with_programmer(&programmer, |port| commands::run_version(port))
        }
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
    }
}

/// Log filter for the number of `-v` flags
fn default_log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Load the loader configuration, falling back to the CX2070x defaults
fn load_config(path: Option<&Path>) -> Result<LoaderConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config = LoaderConfig::from_toml_file(path)?;
            log::info!("Loaded loader configuration from {}", path.display());
            log::debug!("{:?}", config);
            Ok(config)
        }
        None => Ok(LoaderConfig::default()),
    }
}
