use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod demo;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the header of an encoded frame.
    Inspect(InspectArgs),
    /// Encode and decode a synthetic frame and report its size.
    Demo(DemoArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Inspect(args) => inspect::run(args, format),
        Command::Demo(args) => demo::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Encoded frame as a hex string.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub hex: Option<String>,
    /// Read the encoded frame from a file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Byte offset of the frame inside the input.
    #[arg(long, default_value = "0")]
    pub offset: usize,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of float64 channels in the schema.
    #[arg(long, default_value = "8")]
    pub channels: u32,
    /// Samples per channel.
    #[arg(long, default_value = "100")]
    pub samples: usize,
    /// Only send every other channel.
    #[arg(long)]
    pub partial: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
