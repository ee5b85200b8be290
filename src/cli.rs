//! CLI argument parsing

use crate::programmers;
use clap::{Parser, Subcommand};
use cxfw_core::cx2070x::FIRMWARE_NAME;
use std::path::PathBuf;

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer to use [available: {}]",
        programmers::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "cxfw")]
#[command(author, version, about = "CX2070x DSP firmware loader", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Loader configuration file (TOML format)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a firmware image and list its records
    Decode {
        /// Firmware image
        #[arg(short, long, default_value = FIRMWARE_NAME)]
        input: PathBuf,

        /// Only print the summary
        #[arg(short, long)]
        summary: bool,
    },

    /// Download firmware into the codec
    Load {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Firmware image
        #[arg(short, long, default_value = FIRMWARE_NAME)]
        input: PathBuf,

        /// Wait for the device to report ready before downloading
        #[arg(long)]
        wait: bool,

        /// Don't read the firmware version after loading
        #[arg(long)]
        no_version: bool,
    },

    /// Read the firmware identification registers
    Version {
        /// Programmer to use
        #[arg(short, long, help = programmer_help())]
        programmer: String,
    },

    /// List supported programmers
    ListProgrammers,
}
