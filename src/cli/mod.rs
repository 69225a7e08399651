//! CLI command definitions for layerconf
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod get;
pub mod show;

use crate::config::{ConfigSource, RuntimeConfig};
use crate::error::ConfResult;
use clap::{Parser, Subcommand};
use get::GetArgs;
use show::ShowArgs;
use std::path::PathBuf;
use tracing::debug;

/// Layered configuration inspector
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to layer over the defaults (repeatable, applied in order)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Clear the defaults before applying the first file
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the merged configuration (default if no subcommand given)
    Show(ShowArgs),

    /// Print one value by dotted path, e.g. `app.debug`
    Get(GetArgs),

    /// Apply the configuration files and report whether they load
    Check,
}

/// Build the runtime configuration: defaults, then every `--config` file in order.
///
/// `overwrite` only clears before the first file; later files layer.
pub fn build_runtime(files: &[PathBuf], overwrite: bool) -> ConfResult<RuntimeConfig> {
    let mut runtime = RuntimeConfig::new()?;
    for (i, file) in files.iter().enumerate() {
        debug!(file = %file.display(), "Applying configuration file");
        runtime.apply(ConfigSource::Path(file.clone()), overwrite && i == 0)?;
    }
    Ok(runtime)
}
